//! Browser bindings.
//!
//! `WebSession` wraps a [`Session`] for JavaScript. Output is delivered
//! through a callback given at construction: it receives each line as a
//! `{ id, data: { type, value } }` object, or `null` when the screen should
//! be cleared.

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::core::{BrowserTimer, Execution, OutputSink, Session};
use crate::models::OutputLine;

/// Forwards output to a JavaScript callback.
#[derive(Clone)]
struct JsSink {
    callback: Function,
}

impl OutputSink for JsSink {
    fn push(&mut self, line: OutputLine) {
        match serde_wasm_bindgen::to_value(&line) {
            Ok(value) => {
                if let Err(e) = self.callback.call1(&JsValue::NULL, &value) {
                    warn!(error = ?e, "output callback failed");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize output line"),
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.callback.call1(&JsValue::NULL, &JsValue::NULL) {
            warn!(error = ?e, "output callback failed");
        }
    }
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    sink: JsSink,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(on_output: Function) -> WebSession {
        WebSession {
            session: Session::new(),
            sink: JsSink {
                callback: on_output,
            },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    #[wasm_bindgen(js_name = submitCommand)]
    pub fn submit_command(&mut self, line: &str) {
        self.session.submit_command(line, &mut self.sink);
    }

    /// Start streaming a workspace file. Returns the execution id.
    #[wasm_bindgen(js_name = executeFile)]
    pub fn execute_file(&mut self, name: &str) -> Result<f64, JsError> {
        let execution = self.session.execute_file(name).map_err(js_error)?;
        Ok(self.spawn(execution))
    }

    /// Start streaming editor content. Returns the execution id.
    #[wasm_bindgen(js_name = executeSource)]
    pub fn execute_source(&mut self, source: &str) -> f64 {
        let execution = self.session.execute_source(source);
        self.spawn(execution)
    }

    /// Stop the execution with the id returned by `executeFile` or
    /// `executeSource`. Returns `false` when it is no longer running.
    #[wasm_bindgen(js_name = cancelExecution)]
    pub fn cancel_execution(&mut self, id: f64) -> bool {
        self.session.cancel_execution_by_id(id as u64)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.running_execution().is_some()
    }

    #[wasm_bindgen(js_name = recallPrevious)]
    pub fn recall_previous(&mut self) -> Option<String> {
        self.session.recall_previous()
    }

    #[wasm_bindgen(js_name = recallNext)]
    pub fn recall_next(&mut self) -> Option<String> {
        self.session.recall_next()
    }

    /// File summaries as an array of plain objects.
    #[wasm_bindgen(js_name = listFiles)]
    pub fn list_files(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.session.list_files()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = uploadFile)]
    pub fn upload_file(&mut self, name: &str, content: &str) -> Result<(), JsError> {
        self.session.upload_file(name, content).map_err(js_error)
    }

    #[wasm_bindgen(js_name = downloadFile)]
    pub fn download_file(&self, name: &str) -> Result<String, JsError> {
        self.session.download_file(name).map_err(js_error)
    }

    #[wasm_bindgen(js_name = saveFile)]
    pub fn save_file(&mut self, name: &str, content: &str) -> Result<(), JsError> {
        self.session.save_file(name, content).map_err(js_error)
    }

    #[wasm_bindgen(js_name = newFile)]
    pub fn new_file(&mut self, name: &str) -> Result<(), JsError> {
        self.session.new_file(name).map(|_| ()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteFile)]
    pub fn delete_file(&mut self, name: &str) -> Result<(), JsError> {
        self.session.delete_file(name).map_err(js_error)
    }
}

impl WebSession {
    fn spawn(&self, execution: Execution) -> f64 {
        let id = execution.handle().id() as f64;
        let mut sink = self.sink.clone();
        spawn_local(async move {
            execution.run(&BrowserTimer, &mut sink).await;
        });
        id
    }
}
