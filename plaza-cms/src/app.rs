use serde_json::Value;

use plaza_core::PlazaApp;

use crate::locales::DEFAULT_LOCALE;
use crate::params::CmsParams;

/// Build the bare app container with configuration defaults and
/// environment overrides applied.
pub fn cms_app() -> PlazaApp<Value, CmsParams> {
    let app: PlazaApp<Value, CmsParams> = PlazaApp::new();

    app.set("app.name", "plaza");
    app.set("seed.enabled", "false");
    app.set("locales.default", DEFAULT_LOCALE);

    load_env_config(&app, "PLAZA__");

    app
}

/// Environment overrides: PLAZA__SEED__ENABLED=true → seed.enabled.
pub fn load_env_config(app: &PlazaApp<Value, CmsParams>, prefix: &str) {
    for (key, value) in std::env::vars() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let normalized = stripped.to_lowercase().replace("__", ".");
            app.set(normalized, value);
        }
    }
}
