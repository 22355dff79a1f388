//! Input-method strategy for text fields.
//!
//! Reports and descriptions can be typed in Sinhala or Tamil through a host
//! keyboard plugin. The plugin is injected as a [`ScriptKeyboard`] and the
//! active [`InputMethod`] is chosen from configuration; an [`InputSession`]
//! tracks which fields are attached so switching methods moves them over.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Configured input method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputMethodKind {
    /// The platform keyboard, no plugin.
    #[default]
    Default,
    Sinhala,
    Tamil,
}

impl InputMethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMethodKind::Default => "default",
            InputMethodKind::Sinhala => "sinhala",
            InputMethodKind::Tamil => "tamil",
        }
    }
}

impl fmt::Display for InputMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input method '{0}' (expected default, sinhala or tamil)")]
pub struct ParseInputMethodError(pub String);

impl FromStr for InputMethodKind {
    type Err = ParseInputMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "" => Ok(InputMethodKind::Default),
            "sinhala" | "si" => Ok(InputMethodKind::Sinhala),
            "tamil" | "ta" => Ok(InputMethodKind::Tamil),
            other => Err(ParseInputMethodError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("keyboard plugin failed to attach to '{field}': {reason}")]
    AttachFailed { field: String, reason: String },
}

/// Host keyboard plugin for one script.
pub trait ScriptKeyboard: Send + Sync {
    fn attach(&self, field: &str) -> Result<(), InputError>;
    fn detach(&self, field: &str);
}

/// The active input strategy.
#[derive(Clone, Default)]
pub enum InputMethod {
    #[default]
    Default,
    Sinhala(Arc<dyn ScriptKeyboard>),
    Tamil(Arc<dyn ScriptKeyboard>),
}

impl fmt::Debug for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputMethod::{:?}", self.kind())
    }
}

/// Plugins the host has available.
#[derive(Clone, Default)]
pub struct KeyboardPlugins {
    pub sinhala: Option<Arc<dyn ScriptKeyboard>>,
    pub tamil: Option<Arc<dyn ScriptKeyboard>>,
}

impl InputMethod {
    /// Pick the method for `kind`, falling back to the default keyboard when
    /// the plugin is missing.
    pub fn select(kind: InputMethodKind, plugins: &KeyboardPlugins) -> Self {
        let plugin = match kind {
            InputMethodKind::Default => return InputMethod::Default,
            InputMethodKind::Sinhala => plugins.sinhala.clone().map(InputMethod::Sinhala),
            InputMethodKind::Tamil => plugins.tamil.clone().map(InputMethod::Tamil),
        };
        plugin.unwrap_or_else(|| {
            tracing::warn!(method = %kind, "Keyboard plugin unavailable, using default input");
            InputMethod::Default
        })
    }

    pub fn kind(&self) -> InputMethodKind {
        match self {
            InputMethod::Default => InputMethodKind::Default,
            InputMethod::Sinhala(_) => InputMethodKind::Sinhala,
            InputMethod::Tamil(_) => InputMethodKind::Tamil,
        }
    }

    /// Same variant backed by the same plugin instance.
    fn same_as(&self, other: &InputMethod) -> bool {
        match (self.keyboard(), other.keyboard()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                self.kind() == other.kind()
                    && std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            }
            _ => false,
        }
    }

    fn keyboard(&self) -> Option<&Arc<dyn ScriptKeyboard>> {
        match self {
            InputMethod::Default => None,
            InputMethod::Sinhala(k) | InputMethod::Tamil(k) => Some(k),
        }
    }

    pub fn attach(&self, field: &str) -> Result<(), InputError> {
        match self.keyboard() {
            Some(keyboard) => keyboard.attach(field),
            None => Ok(()),
        }
    }

    pub fn detach(&self, field: &str) {
        if let Some(keyboard) = self.keyboard() {
            keyboard.detach(field);
        }
    }
}

/// Fields bound to the current input method.
///
/// Dropping the session detaches every field.
#[derive(Debug, Default)]
pub struct InputSession {
    method: InputMethod,
    fields: BTreeSet<String>,
}

impl InputSession {
    pub fn new(method: InputMethod) -> Self {
        Self {
            method,
            fields: BTreeSet::new(),
        }
    }

    pub fn method(&self) -> InputMethodKind {
        self.method.kind()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Bind `field` to the current method. A field the plugin rejects stays
    /// on the platform keyboard and is not tracked.
    pub fn attach(&mut self, field: &str) -> Result<(), InputError> {
        if self.fields.contains(field) {
            return Ok(());
        }
        self.method.attach(field)?;
        self.fields.insert(field.to_string());
        Ok(())
    }

    pub fn detach(&mut self, field: &str) {
        if self.fields.remove(field) {
            self.method.detach(field);
        }
    }

    /// Move every attached field to `method`.
    ///
    /// Fields the new plugin rejects are dropped from the session and logged.
    pub fn switch_to(&mut self, method: InputMethod) {
        if method.same_as(&self.method) {
            return;
        }

        for field in &self.fields {
            self.method.detach(field);
        }
        let previous = std::mem::replace(&mut self.method, method);
        tracing::info!(from = %previous.kind(), to = %self.method.kind(), "Input method switched");

        let method = &self.method;
        self.fields.retain(|field| match method.attach(field) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(field = %field, error = %e, "Field left on default input");
                false
            }
        });
    }
}

impl Drop for InputSession {
    fn drop(&mut self) {
        for field in &self.fields {
            self.method.detach(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeKeyboard {
        attached: Mutex<BTreeSet<String>>,
        reject: Option<&'static str>,
    }

    impl ScriptKeyboard for FakeKeyboard {
        fn attach(&self, field: &str) -> Result<(), InputError> {
            if self.reject == Some(field) {
                return Err(InputError::AttachFailed {
                    field: field.to_string(),
                    reason: "read-only".to_string(),
                });
            }
            self.attached.lock().insert(field.to_string());
            Ok(())
        }

        fn detach(&self, field: &str) {
            self.attached.lock().remove(field);
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Sinhala".parse::<InputMethodKind>().unwrap(), InputMethodKind::Sinhala);
        assert_eq!("ta".parse::<InputMethodKind>().unwrap(), InputMethodKind::Tamil);
        assert_eq!("".parse::<InputMethodKind>().unwrap(), InputMethodKind::Default);
        assert!("klingon".parse::<InputMethodKind>().is_err());
    }

    #[test]
    fn test_select_falls_back_without_plugin() {
        let plugins = KeyboardPlugins::default();
        let method = InputMethod::select(InputMethodKind::Tamil, &plugins);
        assert_eq!(method.kind(), InputMethodKind::Default);
    }

    #[test]
    fn test_select_with_plugin() {
        let plugins = KeyboardPlugins {
            sinhala: Some(Arc::new(FakeKeyboard::default())),
            tamil: None,
        };
        let method = InputMethod::select(InputMethodKind::Sinhala, &plugins);
        assert_eq!(method.kind(), InputMethodKind::Sinhala);
    }

    #[test]
    fn test_session_attach_and_drop() {
        let keyboard = Arc::new(FakeKeyboard::default());
        {
            let mut session = InputSession::new(InputMethod::Sinhala(keyboard.clone()));
            session.attach("description").unwrap();
            session.attach("description").unwrap();
            assert_eq!(keyboard.attached.lock().len(), 1);
        }
        assert!(keyboard.attached.lock().is_empty());
    }

    #[test]
    fn test_switch_moves_fields() {
        let sinhala = Arc::new(FakeKeyboard::default());
        let tamil = Arc::new(FakeKeyboard {
            reject: Some("phone"),
            ..Default::default()
        });

        let mut session = InputSession::new(InputMethod::Sinhala(sinhala.clone()));
        session.attach("description").unwrap();
        session.attach("phone").unwrap();

        session.switch_to(InputMethod::Tamil(tamil.clone()));

        assert_eq!(session.method(), InputMethodKind::Tamil);
        assert!(sinhala.attached.lock().is_empty());
        assert_eq!(session.fields().collect::<Vec<_>>(), vec!["description"]);
        assert!(tamil.attached.lock().contains("description"));
    }

    #[test]
    fn test_switch_to_new_plugin_of_same_kind() {
        let old = Arc::new(FakeKeyboard::default());
        let new = Arc::new(FakeKeyboard::default());

        let mut session = InputSession::new(InputMethod::Sinhala(old.clone()));
        session.attach("description").unwrap();
        session.switch_to(InputMethod::Sinhala(new.clone()));

        assert!(old.attached.lock().is_empty());
        assert!(new.attached.lock().contains("description"));

        drop(session);
        assert!(old.attached.lock().is_empty());
        assert!(new.attached.lock().is_empty());
    }

    #[test]
    fn test_switch_to_same_plugin_keeps_fields() {
        let keyboard = Arc::new(FakeKeyboard::default());
        let mut session = InputSession::new(InputMethod::Tamil(keyboard.clone()));
        session.attach("title").unwrap();

        session.switch_to(InputMethod::Tamil(keyboard.clone()));

        assert!(keyboard.attached.lock().contains("title"));
        assert_eq!(session.fields().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_detach() {
        let keyboard = Arc::new(FakeKeyboard::default());
        let mut session = InputSession::new(InputMethod::Tamil(keyboard.clone()));
        session.attach("title").unwrap();
        session.detach("title");
        assert!(keyboard.attached.lock().is_empty());
        assert_eq!(session.fields().count(), 0);
    }

    #[test]
    fn test_default_method_attaches_without_plugin() {
        let mut session = InputSession::default();
        session.attach("title").unwrap();
        assert_eq!(session.fields().collect::<Vec<_>>(), vec!["title"]);
    }
}
