//! Entry point exported to JavaScript.
//!
//! `App` holds the page registry and the session and does all the work;
//! `WasmApp` only converts values across the boundary.

use crate::controls::{ControlSpec, Controls, ResolvedControls};
use crate::figure::PageView;
use crate::pages::{ModuleEntry, PageRegistry};
use crate::session::{Session, Side};
use anyhow::{anyhow, Context, Result};
use serde_wasm_bindgen::{from_value, to_value};
use tracing::{event, Level};
use wasm_bindgen::prelude::*;

#[derive(Default)]
pub struct App {
    registry: PageRegistry,
    session: Session,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> Vec<ModuleEntry> {
        self.registry.catalog(&self.session)
    }

    pub fn controls(&self, page_id: &str) -> Result<Vec<ControlSpec>> {
        Ok(self.registry.get(page_id)?.controls(&self.session))
    }

    pub fn render(&mut self, page_id: &str, controls: &Controls) -> Result<PageView> {
        let page = self.registry.get(page_id)?;
        let resolved = ResolvedControls::resolve(&page.controls(&self.session), controls)
            .with_context(|| format!("Invalid controls for '{}'", page_id))?;
        event!(Level::DEBUG, page = page_id, "rendering page");
        page.render(&resolved, &mut self.session)
    }

    pub fn act(&mut self, page_id: &str, action: &str, controls: &Controls) -> Result<()> {
        let page = self.registry.get(page_id)?;
        let resolved = ResolvedControls::resolve(&page.controls(&self.session), controls)
            .with_context(|| format!("Invalid controls for '{}'", page_id))?;
        event!(Level::DEBUG, page = page_id, action, "page action");
        page.act(action, &resolved, &mut self.session)
    }

    /// Fits the schedule in `controls` and hands it to the market page.
    pub fn send_curve(&mut self, side: &str, controls: &Controls) -> Result<()> {
        let side = Side::parse(side).ok_or_else(|| anyhow!("Unknown curve side '{}'", side))?;
        let page_id = match side {
            Side::Demand => "demand_schedule",
            Side::Supply => "supply_schedule",
        };
        self.act(page_id, "send", controls)
    }

    pub fn take_nav_default(&mut self) -> Option<String> {
        self.session.take_nav_default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_controls(controls_val: JsValue) -> Result<Controls, JsValue> {
    if controls_val.is_undefined() || controls_val.is_null() {
        return Ok(Controls::default());
    }
    from_value(controls_val).map_err(|e| JsValue::from_str(&format!("Invalid controls: {}", e)))
}

#[wasm_bindgen]
pub struct WasmApp {
    app: App,
}

#[wasm_bindgen]
impl WasmApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmApp {
        console_error_panic_hook::set_once();
        let app = App::new();
        event!(
            Level::INFO,
            pages = app.registry.len(),
            "page registry ready"
        );
        WasmApp { app }
    }

    pub fn catalog(&self) -> Result<JsValue, JsValue> {
        serialize(&self.app.catalog())
    }

    pub fn page_ids(&self) -> js_sys::Array {
        self.app
            .catalog()
            .iter()
            .flat_map(|module| module.pages.iter())
            .map(|page| JsValue::from_str(page.id))
            .collect()
    }

    pub fn controls(&self, page_id: &str) -> Result<JsValue, JsValue> {
        let specs = self.app.controls(page_id).map_err(js_error)?;
        serialize(&specs)
    }

    pub fn render(&mut self, page_id: &str, controls_val: JsValue) -> Result<JsValue, JsValue> {
        let controls = parse_controls(controls_val)?;
        let view = self.app.render(page_id, &controls).map_err(js_error)?;
        serialize(&view)
    }

    pub fn act(
        &mut self,
        page_id: &str,
        action: &str,
        controls_val: JsValue,
    ) -> Result<(), JsValue> {
        let controls = parse_controls(controls_val)?;
        self.app.act(page_id, action, &controls).map_err(js_error)
    }

    pub fn send_curve(&mut self, side: &str, controls_val: JsValue) -> Result<(), JsValue> {
        let controls = parse_controls(controls_val)?;
        self.app.send_curve(side, &controls).map_err(js_error)
    }

    pub fn take_nav_default(&mut self) -> Option<String> {
        self.app.take_nav_default()
    }
}

impl Default for WasmApp {
    fn default() -> Self {
        Self::new()
    }
}
