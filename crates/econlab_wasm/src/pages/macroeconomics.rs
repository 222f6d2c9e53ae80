use super::Page;
use crate::controls::{ControlSpec, ResolvedControls};
use crate::figure::{series_viewport, Figure, PageView};
use crate::session::Session;
use anyhow::Result;
use econlab_core::grid::linspace;
use econlab_core::models::{
    multiplier_output, simulate_debt, simulate_hank, simulate_nk, simulate_phillips, simulate_solow,
    solve_ad_as, solve_is_lm, AdAsParams, DebtParams, HankTeaserParams, IsLmParams, NkParams,
    NkShock, NkShockTarget, NkpcParams, Shock, SolowParams,
};
use econlab_core::{Point2D, Viewport};

/// Box around the finite values of two curves plotted over a shared grid.
fn curve_box(xs: &[f64], ys: &[&[f64]], y_is_x: bool) -> Result<Viewport> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for values in ys {
        for &v in values.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() {
        (lo, hi) = (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    let grid_lo = xs.first().copied().unwrap_or(0.0);
    let grid_hi = xs.last().copied().unwrap_or(1.0);
    // The model variable on the grid goes on the vertical axis.
    if y_is_x {
        Ok(Viewport::new(lo - pad, hi + pad, grid_lo, grid_hi)?)
    } else {
        Ok(Viewport::new(grid_lo, grid_hi, lo - pad, hi + pad)?)
    }
}

pub struct IsLmPage;

impl Page for IsLmPage {
    fn id(&self) -> &'static str {
        "is_lm"
    }

    fn title(&self) -> &'static str {
        "IS-LM"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = IsLmParams::default();
        vec![
            ControlSpec::slider("c0", "Autonomous consumption", 0.0, 200.0, d.c0, 1.0),
            ControlSpec::slider("c1", "MPC", 0.1, 0.95, d.c1, 0.01),
            ControlSpec::slider("i0", "Autonomous investment", 0.0, 200.0, d.i0, 1.0),
            ControlSpec::slider("i1", "Investment rate sensitivity", 0.0, 100.0, d.i1, 1.0),
            ControlSpec::slider("g", "Government spending", 0.0, 300.0, d.g, 1.0),
            ControlSpec::slider("t", "Tax rate", 0.0, 0.6, d.t, 0.01),
            ControlSpec::slider("m", "Real money balances (M/P)", 10.0, 600.0, d.m, 5.0),
            ControlSpec::slider("k", "Money demand income sensitivity", 0.1, 2.0, d.k, 0.05),
            ControlSpec::slider("h", "Money demand rate sensitivity", 1.0, 100.0, d.h, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let params = IsLmParams {
            c0: controls.get("c0")?,
            c1: controls.get("c1")?,
            i0: controls.get("i0")?,
            i1: controls.get("i1")?,
            g: controls.get("g")?,
            t: controls.get("t")?,
            m: controls.get("m")?,
            k: controls.get("k")?,
            h: controls.get("h")?,
        };
        let solution = solve_is_lm(&params);

        let curves = [solution.y_is.as_slice(), solution.y_lm.as_slice()];
        let viewport = curve_box(&solution.r_grid, &curves, true)?;
        let mut figure = Figure::new("IS-LM", "Output (Y)", "Interest rate (r)", viewport);
        let trace = |ys: &[f64]| -> Vec<Point2D> {
            ys.iter()
                .zip(&solution.r_grid)
                .map(|(&y, &r)| Point2D::new(y, r))
                .collect()
        };
        figure.polyline("IS", trace(&solution.y_is), false);
        figure.polyline("LM", trace(&solution.y_lm), false);
        let equilibrium = Point2D::new(solution.y_star, solution.r_star);
        figure.point_with_guides("Equilibrium", equilibrium);

        let mut view = PageView::default();
        view.metric("Interest rate r*", Some(solution.r_star));
        view.metric("Output Y*", Some(solution.y_star));
        let lowest = solution.r_grid.first();
        if lowest.is_some_and(|&r0| solution.r_star <= r0) {
            view.note("IS and LM cross at or below r = 0; r* sits on the grid's lower edge.");
        }
        view.note("Equilibrium is the nearest point on a 400-point interest-rate grid.");
        Ok(view.panel(figure))
    }
}

pub struct AdAsPage;

impl Page for AdAsPage {
    fn id(&self) -> &'static str {
        "ad_as"
    }

    fn title(&self) -> &'static str {
        "AD-AS"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = AdAsParams::default();
        vec![
            ControlSpec::slider("a", "AD intercept", 100.0, 300.0, d.a, 1.0),
            ControlSpec::slider("b", "AD slope", 0.1, 3.0, d.b, 0.05),
            ControlSpec::slider("y_potential", "Potential output", 50.0, 150.0, d.y_potential, 1.0),
            ControlSpec::slider("sras_slope", "SRAS slope", 0.1, 3.0, d.sras_slope, 0.05),
            ControlSpec::slider(
                "p_expected",
                "Expected price level",
                50.0,
                150.0,
                d.p_expected,
                1.0,
            ),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let params = AdAsParams {
            a: controls.get("a")?,
            b: controls.get("b")?,
            y_potential: controls.get("y_potential")?,
            sras_slope: controls.get("sras_slope")?,
            p_expected: controls.get("p_expected")?,
        };
        let solution = solve_ad_as(&params);

        let lras = [solution.y_lras];
        let curves = [&solution.y_ad[..], &solution.y_sras[..], &lras[..]];
        let viewport = curve_box(&solution.p_grid, &curves, true)?;
        let mut figure = Figure::new("AD-AS", "Output (Y)", "Price level (P)", viewport);
        let trace = |ys: &[f64]| -> Vec<Point2D> {
            ys.iter()
                .zip(&solution.p_grid)
                .map(|(&y, &p)| Point2D::new(y, p))
                .collect()
        };
        figure.polyline("AD", trace(&solution.y_ad), false);
        figure.polyline("SRAS", trace(&solution.y_sras), false);
        figure.vertical("LRAS", solution.y_lras, true);
        let equilibrium = Point2D::new(solution.y_star, solution.p_star);
        figure.point_with_guides("Short-run equilibrium", equilibrium);

        let mut view = PageView::default();
        view.metric("Price level P*", Some(solution.p_star));
        view.metric("Output Y*", Some(solution.y_star));
        let gap = solution.output_gap();
        let label = if gap > 0.5 {
            "inflationary gap"
        } else if gap < -0.5 {
            "recessionary gap"
        } else {
            "at potential"
        };
        view.metric_with("Output gap", Some(gap), label);
        Ok(view.panel(figure))
    }
}

pub struct SolowPage;

impl Page for SolowPage {
    fn id(&self) -> &'static str {
        "solow"
    }

    fn title(&self) -> &'static str {
        "Solow growth"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = SolowParams::default();
        vec![
            ControlSpec::slider("s", "Saving rate", 0.01, 0.9, d.s, 0.01),
            ControlSpec::slider("delta", "Depreciation", 0.0, 0.2, d.delta, 0.005),
            ControlSpec::slider("n", "Population growth", -0.05, 0.1, d.n, 0.005),
            ControlSpec::slider("g", "Technology growth", -0.05, 0.1, d.g, 0.005),
            ControlSpec::slider("alpha", "Capital share", 0.1, 0.9, d.alpha, 0.01),
            ControlSpec::slider("k0", "Initial capital", 0.1, 20.0, 2.0, 0.1),
            ControlSpec::slider("horizon", "Periods", 10.0, 400.0, 120.0, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let params = SolowParams {
            s: controls.get("s")?,
            delta: controls.get("delta")?,
            n: controls.get("n")?,
            g: controls.get("g")?,
            alpha: controls.get("alpha")?,
        };
        let k0 = controls.get("k0")?;
        let path = simulate_solow(k0, controls.count("horizon")?, &params);
        let steady = params.steady_state();

        let k_top = steady.map_or(k0, |ss| ss.k).max(k0) * 2.0;
        let ks = linspace(0.0, k_top, 200);
        let saving: Vec<f64> = ks.iter().map(|&k| params.s * params.output(k)).collect();
        let break_even: Vec<f64> = ks.iter().map(|&k| params.break_even(k)).collect();
        let finite = || {
            saving
                .iter()
                .chain(&break_even)
                .copied()
                .filter(|v| v.is_finite())
        };
        let top = finite().fold(1e-3, f64::max);
        let bottom = finite().fold(0.0, f64::min);
        let mut diagram = Figure::new(
            "Saving and break-even investment",
            "Capital per effective worker (k)",
            "Investment",
            Viewport::new(0.0, k_top.max(1e-3), bottom * 1.1, top * 1.1)?,
        );
        let pairs = |ys: &[f64]| -> Vec<Point2D> {
            ks.iter()
                .zip(ys)
                .map(|(&k, &y)| Point2D::new(k, y))
                .collect()
        };
        diagram.polyline("s·f(k)", pairs(&saving), false);
        diagram.polyline("(n+g+δ)·k", pairs(&break_even), false);

        let mut series = Figure::new(
            "Transition path",
            "Period",
            "Level",
            series_viewport(path.k.len(), [path.k.as_slice(), path.y.as_slice()])?,
        );
        series.series("k", &path.k, false);
        series.series("y", &path.y, false);

        let mut view = PageView::default();
        match steady {
            Some(ss) => {
                diagram.point_with_guides("Steady state", Point2D::new(ss.k, params.s * ss.y));
                view.metric("Steady-state k*", Some(ss.k));
                view.metric("Steady-state y*", Some(ss.y));
            }
            None => {
                view.metric("Steady-state k*", None);
                view.metric("Steady-state y*", None);
                view.note("No steady state: n + g + δ must be positive.");
            }
        }
        if let (Some(last), Some(prev)) = (path.k.last(), path.k.iter().rev().nth(1)) {
            view.metric("Last step |Δk|", Some((last - prev).abs()));
        }
        Ok(view.panel(diagram).panel(series))
    }
}

pub struct PhillipsPage;

impl Page for PhillipsPage {
    fn id(&self) -> &'static str {
        "phillips_curve"
    }

    fn title(&self) -> &'static str {
        "New Keynesian Phillips curve"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = NkpcParams::default();
        vec![
            ControlSpec::slider("beta", "Inflation persistence (β)", 0.0, 0.99, d.beta, 0.01),
            ControlSpec::slider("kappa", "Slope (κ)", 0.0, 1.0, d.kappa, 0.01),
            ControlSpec::slider("y_gap", "Output gap", -5.0, 5.0, 1.0, 0.1),
            ControlSpec::slider("shock_t", "Shock period", 0.0, 100.0, 10.0, 1.0),
            ControlSpec::slider("shock_size", "Cost-push shock", -5.0, 5.0, 0.0, 0.1),
            ControlSpec::slider("shock_decay", "Shock persistence", 0.0, 0.99, 0.5, 0.01),
            ControlSpec::slider("horizon", "Periods", 10.0, 200.0, 40.0, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let params = NkpcParams {
            beta: controls.get("beta")?,
            kappa: controls.get("kappa")?,
        };
        let y_gap = controls.get("y_gap")?;
        let shock = Shock {
            at: controls.count("shock_t")?,
            size: controls.get("shock_size")?,
            decay: controls.get("shock_decay")?,
        };
        let path = simulate_phillips(controls.count("horizon")?, y_gap, &shock, &params);

        let plotted = [path.pi.as_slice(), path.shock.as_slice()];
        let viewport = series_viewport(path.pi.len(), plotted)?;
        let mut figure = Figure::new("Inflation", "Period", "π", viewport);
        figure.series("Inflation", &path.pi, false);
        figure.series("Cost-push shock", &path.shock, true);

        let mut view = PageView::default();
        view.metric("Long-run inflation", params.long_run_inflation(y_gap));
        view.metric("Final inflation", path.pi.last().copied());
        Ok(view.panel(figure))
    }
}

const NK_TARGETS: [NkShockTarget; 3] = [
    NkShockTarget::Demand,
    NkShockTarget::CostPush,
    NkShockTarget::Policy,
];

pub struct NkDsgePage;

impl Page for NkDsgePage {
    fn id(&self) -> &'static str {
        "nk_dsge"
    }

    fn title(&self) -> &'static str {
        "Three-equation New Keynesian model"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = NkParams::default();
        vec![
            ControlSpec::slider("sigma", "σ", 0.1, 5.0, d.sigma, 0.1),
            ControlSpec::slider("beta", "β", 0.0, 0.99, d.beta, 0.01),
            ControlSpec::slider("kappa", "κ", 0.0, 1.0, d.kappa, 0.01),
            ControlSpec::slider("phi_pi", "Taylor φπ", 0.0, 3.0, d.phi_pi, 0.05),
            ControlSpec::slider("phi_y", "Taylor φy", 0.0, 2.0, d.phi_y, 0.05),
            ControlSpec::slider("r_natural", "Neutral rate r*", -2.0, 5.0, d.r_natural, 0.1),
            ControlSpec::choice(
                "shock_target",
                "Shock",
                &["demand", "cost_push", "policy"],
                0,
            ),
            ControlSpec::slider("shock_t", "Shock period", 0.0, 50.0, 5.0, 1.0),
            ControlSpec::slider("shock_size", "Shock size", -3.0, 3.0, 1.0, 0.1),
            ControlSpec::slider("horizon", "Periods", 10.0, 100.0, 30.0, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let params = NkParams {
            sigma: controls.get("sigma")?,
            beta: controls.get("beta")?,
            kappa: controls.get("kappa")?,
            phi_pi: controls.get("phi_pi")?,
            phi_y: controls.get("phi_y")?,
            r_natural: controls.get("r_natural")?,
        };
        let shock = NkShock {
            target: NK_TARGETS[controls.index("shock_target")?.min(NK_TARGETS.len() - 1)],
            at: controls.count("shock_t")?,
            size: controls.get("shock_size")?,
        };
        let path = simulate_nk(controls.count("horizon")?, &shock, &params);

        let responses = [
            path.output_gap.as_slice(),
            path.inflation.as_slice(),
            path.rate.as_slice(),
        ];
        let viewport = series_viewport(path.output_gap.len(), responses)?;
        let mut figure = Figure::new("Impulse responses", "Period", "Deviation", viewport);
        figure.series("Output gap", &path.output_gap, false);
        figure.series("Inflation", &path.inflation, false);
        figure.series("Policy rate", &path.rate, true);

        let mut view = PageView::default();
        let peak = |xs: &[f64]| {
            xs.iter()
                .copied()
                .reduce(|best, v| if v.abs() > best.abs() { v } else { best })
        };
        view.metric("Peak output gap", peak(&path.output_gap));
        view.metric("Peak inflation", peak(&path.inflation));
        if params.phi_pi <= 1.0 {
            view.note("φπ ≤ 1 violates the Taylor principle; responses may not settle.");
        }
        Ok(view.panel(figure))
    }
}

pub struct FiscalPage;

impl Page for FiscalPage {
    fn id(&self) -> &'static str {
        "fiscal_multipliers"
    }

    fn title(&self) -> &'static str {
        "Fiscal multipliers and debt"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = DebtParams::default();
        vec![
            ControlSpec::slider("multiplier", "Multiplier", 0.0, 3.0, 1.5, 0.05),
            ControlSpec::slider("dg_pct", "Change in G (% of GDP)", -10.0, 10.0, 2.0, 0.1),
            ControlSpec::slider("debt", "Initial debt (% of GDP)", 0.0, 250.0, d.initial, 1.0),
            ControlSpec::slider("interest", "Interest rate (%)", 0.0, 15.0, d.interest, 0.1),
            ControlSpec::slider("growth", "Nominal growth (%)", -5.0, 15.0, d.growth, 0.1),
            ControlSpec::slider(
                "primary",
                "Primary balance (% of GDP)",
                -10.0,
                10.0,
                d.primary_balance,
                0.1,
            ),
            ControlSpec::slider("years", "Years", 5.0, 60.0, 30.0, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let y0 = 100.0;
        let y1 = multiplier_output(y0, controls.get("multiplier")?, controls.get("dg_pct")?);
        let debt = DebtParams {
            initial: controls.get("debt")?,
            interest: controls.get("interest")?,
            growth: controls.get("growth")?,
            primary_balance: controls.get("primary")?,
        };
        let path = simulate_debt(controls.count("years")?, &debt);

        let mut output = Figure::new(
            "Output index",
            "Scenario",
            "Output (baseline = 100)",
            Viewport::new(-0.5, 1.5, 0.0, y0.max(y1) * 1.2)?,
        );
        let bar = |x: f64, height: f64| [Point2D::new(x, 0.0), Point2D::new(x, height)];
        output.polyline("Baseline", bar(0.0, y0), false);
        output.polyline("After fiscal change", bar(1.0, y1), false);
        output.marker("Baseline", Point2D::new(0.0, y0));
        output.marker("After", Point2D::new(1.0, y1));

        let debt_box = series_viewport(path.len(), [path.as_slice()])?;
        let mut debt_fig = Figure::new("Debt-to-GDP", "Year", "% of GDP", debt_box);
        debt_fig.series("Debt", &path, false);

        let mut view = PageView::default();
        view.metric("Output after change", Some(y1));
        view.metric("Final debt ratio", path.last().copied());
        let r_minus_g = debt.interest - debt.growth;
        let trend = if r_minus_g > 0.0 {
            "debt snowballs without a surplus"
        } else {
            "growth erodes the debt ratio"
        };
        view.metric_with("r − g", Some(r_minus_g), trend);
        Ok(view.panel(output).panel(debt_fig))
    }
}

pub struct HankPage;

impl Page for HankPage {
    fn id(&self) -> &'static str {
        "hank"
    }

    fn title(&self) -> &'static str {
        "Heterogeneous households (HANK teaser)"
    }

    fn controls(&self, _session: &Session) -> Vec<ControlSpec> {
        let d = HankTeaserParams::default();
        vec![
            ControlSpec::slider("lambda", "Hand-to-mouth share", 0.0, 1.0, d.lambda, 0.01),
            ControlSpec::slider("mpc_htm", "MPC hand-to-mouth", 0.0, 1.0, d.mpc_htm, 0.01),
            ControlSpec::slider("mpc_saver", "MPC savers", 0.0, 1.0, d.mpc_saver, 0.01),
            ControlSpec::slider(
                "ir_elast_saver",
                "Saver rate response",
                -2.0,
                0.0,
                d.ir_elast_saver,
                0.05,
            ),
            ControlSpec::slider("multiplier", "Output multiplier", 0.5, 3.0, d.multiplier, 0.05),
            ControlSpec::slider("shock_decay", "Shock persistence", 0.0, 0.99, d.shock_decay, 0.01),
            ControlSpec::slider("dy", "Transitory income shock", -5.0, 5.0, 1.0, 0.1),
            ControlSpec::slider("di_pp", "Rate change (pp)", -3.0, 3.0, 0.0, 0.05),
            ControlSpec::slider("shock_t", "Shock period", 0.0, 40.0, 2.0, 1.0),
            ControlSpec::slider("horizon", "Periods", 5.0, 80.0, 20.0, 1.0),
        ]
    }

    fn render(&self, controls: &ResolvedControls, _session: &mut Session) -> Result<PageView> {
        let params = HankTeaserParams {
            lambda: controls.get("lambda")?,
            mpc_htm: controls.get("mpc_htm")?,
            mpc_saver: controls.get("mpc_saver")?,
            ir_elast_saver: controls.get("ir_elast_saver")?,
            multiplier: controls.get("multiplier")?,
            shock_decay: controls.get("shock_decay")?,
        };
        let path = simulate_hank(
            controls.count("horizon")?,
            controls.count("shock_t")?,
            controls.get("dy")?,
            controls.get("di_pp")?,
            &params,
        );

        let all = [
            path.dc_htm.as_slice(),
            path.dc_saver.as_slice(),
            path.dc.as_slice(),
            path.dy.as_slice(),
        ];
        let mut figure = Figure::new(
            "Consumption and output responses",
            "Period",
            "Change",
            series_viewport(path.dy.len(), all)?,
        );
        figure.series("Hand-to-mouth consumption", &path.dc_htm, false);
        figure.series("Saver consumption", &path.dc_saver, false);
        figure.series("Aggregate consumption", &path.dc, false);
        figure.series("Output", &path.dy, true);

        let mut view = PageView::default();
        view.metric("Cumulative output response", Some(path.dy.iter().sum()));
        let impact = path.dy.get(controls.count("shock_t")?).copied();
        view.metric("Impact output response", impact);
        view.note("A two-household heuristic, not a solved general-equilibrium model.");
        Ok(view.panel(figure))
    }
}
