//! The project engine lives in JS as `window.vm`; this bridges the
//! [`Engine`] port onto it. A missing VM or method is skipped, so the shell
//! can mount before the engine has been attached.

use futures_util::future::LocalBoxFuture;
use js_sys::{Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use player_shell_core::{CompilerOptionsPatch, Engine};

const VM_GLOBAL: &str = "vm";

pub(crate) struct VmBridge;

fn vm() -> Option<Object> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(VM_GLOBAL)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Object>().ok()
}

fn renderer() -> Option<Object> {
    let vm = vm()?;
    let value = Reflect::get(&vm, &JsValue::from_str("renderer")).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Object>().ok()
}

fn call(target: &Object, method: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let value = Reflect::get(target, &JsValue::from_str(method)).map_err(js_err)?;
    let func = value
        .dyn_into::<Function>()
        .map_err(|_| format!("{method} is not a function"))?;
    let array = js_sys::Array::new();
    for arg in args {
        array.push(arg);
    }
    func.apply(target, &array).map_err(js_err)
}

fn call_vm(method: &str, args: &[JsValue]) {
    let Some(vm) = vm() else {
        gloo::console::warn!("vm missing, skipped", method);
        return;
    };
    if let Err(err) = call(&vm, method, args) {
        gloo::console::warn!("vm call failed", method, err);
    }
}

fn options_object(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    format!("{error:?}")
}

impl Engine for VmBridge {
    fn set_framerate(&self, framerate: u32) {
        call_vm("setFramerate", &[JsValue::from_f64(f64::from(framerate))]);
    }

    fn set_turbo_mode(&self, enabled: bool) {
        call_vm("setTurboMode", &[JsValue::from_bool(enabled)]);
    }

    fn set_max_clones(&self, max_clones: u32) {
        let options = options_object(&[("maxClones", JsValue::from_f64(f64::from(max_clones)))]);
        call_vm("setRuntimeOptions", &[options]);
    }

    fn set_compiler_options(&self, patch: CompilerOptionsPatch) {
        let mut entries = Vec::new();
        if let Some(enabled) = patch.enabled {
            entries.push(("enabled", JsValue::from_bool(enabled)));
        }
        if let Some(warp_timer) = patch.warp_timer {
            entries.push(("warpTimer", JsValue::from_bool(warp_timer)));
        }
        call_vm("setCompilerOptions", &[options_object(&entries)]);
    }

    fn set_high_quality_pen(&self, enabled: bool) {
        let Some(renderer) = renderer() else {
            gloo::console::warn!("renderer missing, high quality pen skipped");
            return;
        };
        if let Err(err) = call(&renderer, "setUseHighQualityPen", &[JsValue::from_bool(enabled)]) {
            gloo::console::warn!("renderer call failed", err);
        }
    }

    fn load_project(&self, bytes: Vec<u8>) -> LocalBoxFuture<'_, Result<(), String>> {
        Box::pin(async move {
            let vm = vm().ok_or_else(|| "vm is not attached".to_string())?;
            let buffer = Uint8Array::from(bytes.as_slice()).buffer();
            let result = call(&vm, "loadProject", &[buffer.into()])?;
            let promise = result
                .dyn_into::<Promise>()
                .map_err(|_| "loadProject did not return a promise".to_string())?;
            JsFuture::from(promise).await.map(|_| ()).map_err(js_err)
        })
    }

    fn redraw(&self) {
        if let Some(renderer) = renderer() {
            let _ = call(&renderer, "draw", &[]);
        }
    }
}
