//! Named per-connection options.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, SqlPortableError};
use crate::portability::Portability;

/// A value for one named option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Portability(Portability),
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<Portability> for OptionValue {
    fn from(value: Portability) -> Self {
        OptionValue::Portability(value)
    }
}

/// Option store with fixed names and defaults.
///
/// Loadable from JSON; unknown keys are rejected there just as in [`Options::set`]:
/// ```rust
/// use sql_portable::prelude::*;
///
/// let opts = Options::from_json_str(r#"{ "seqname_format": "seq_%s", "portability": 34 }"#)?;
/// assert_eq!(opts.seqname_format, "seq_%s");
/// assert!(opts.portability.contains(Portability::NULL_TO_EMPTY));
/// # Ok::<(), SqlPortableError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub result_buffering: i64,
    pub persistent: bool,
    pub debug: i64,
    pub seqname_format: String,
    pub autofree: bool,
    pub portability: Portability,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            result_buffering: 500,
            persistent: false,
            debug: 0,
            seqname_format: "%s_seq".to_string(),
            autofree: false,
            portability: Portability::NONE,
        }
    }
}

impl Options {
    pub const NAMES: [&'static str; 6] = [
        "result_buffering",
        "persistent",
        "debug",
        "seqname_format",
        "autofree",
        "portability",
    ];

    /// Parse options from a JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    /// * `ErrorCode::Error` if the document is malformed or names an unknown option.
    /// * `ErrorCode::Mismatch` if `portability` carries bits outside [`Portability::ALL`].
    pub fn from_json_str(json: &str) -> Result<Self, SqlPortableError> {
        let opts: Self = serde_json::from_str(json).map_err(|e| {
            SqlPortableError::with_info(ErrorCode::Error, format!("invalid options: {e}"))
        })?;
        portability_from_int(i64::from(opts.portability.bits()))?;
        Ok(opts)
    }

    /// Set one option by name.
    ///
    /// # Errors
    /// * `ErrorCode::Error` for an unknown name.
    /// * `ErrorCode::Mismatch` when the value has the wrong type for the option, or an integer
    ///   `portability` is not a combination of known flags.
    pub fn set(&mut self, name: &str, value: OptionValue) -> Result<(), SqlPortableError> {
        match (name, value) {
            ("result_buffering", OptionValue::Int(v)) => self.result_buffering = v,
            ("persistent", OptionValue::Bool(v)) => self.persistent = v,
            ("debug", OptionValue::Int(v)) => self.debug = v,
            ("seqname_format", OptionValue::Text(v)) => self.seqname_format = v,
            ("autofree", OptionValue::Bool(v)) => self.autofree = v,
            ("portability", OptionValue::Portability(v)) => self.portability = v,
            ("portability", OptionValue::Int(v)) => self.portability = portability_from_int(v)?,
            (name, value) if Self::NAMES.contains(&name) => {
                return Err(SqlPortableError::with_info(
                    ErrorCode::Mismatch,
                    format!("option {name} cannot take {value:?}"),
                ));
            }
            (name, _) => return Err(unknown_option(name)),
        }
        Ok(())
    }

    /// Read one option by name.
    ///
    /// # Errors
    /// Returns `ErrorCode::Error` for an unknown name.
    pub fn get(&self, name: &str) -> Result<OptionValue, SqlPortableError> {
        Ok(match name {
            "result_buffering" => OptionValue::Int(self.result_buffering),
            "persistent" => OptionValue::Bool(self.persistent),
            "debug" => OptionValue::Int(self.debug),
            "seqname_format" => OptionValue::Text(self.seqname_format.clone()),
            "autofree" => OptionValue::Bool(self.autofree),
            "portability" => OptionValue::Portability(self.portability),
            other => return Err(unknown_option(other)),
        })
    }

    /// Map a public sequence name to the backend's name for it.
    ///
    /// Characters outside `[A-Za-z0-9_.]` become `_`, then the result fills the `%s` slot of
    /// `seqname_format`.
    #[must_use]
    pub fn sequence_name(&self, public_name: &str) -> String {
        let cleaned: String = public_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format_one_slot(&self.seqname_format, &cleaned)
    }
}

fn portability_from_int(v: i64) -> Result<Portability, SqlPortableError> {
    u32::try_from(v)
        .ok()
        .filter(|bits| bits & !Portability::ALL.bits() == 0)
        .map(Portability::from_bits)
        .ok_or_else(|| {
            SqlPortableError::with_info(
                ErrorCode::Mismatch,
                format!("portability {v} is not a combination of known flags"),
            )
        })
}

fn unknown_option(name: &str) -> SqlPortableError {
    SqlPortableError::with_info(ErrorCode::Error, format!("unknown option {name}"))
}

/// Minimal sprintf: the first `%s` takes `arg`, `%%` is a literal percent.
fn format_one_slot(format: &str, arg: &str) -> String {
    let mut out = String::with_capacity(format.len() + arg.len());
    let mut used = false;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') if !used => {
                out.push_str(arg);
                used = true;
                chars.next();
            }
            Some('%') => {
                out.push('%');
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.get("result_buffering").unwrap(), OptionValue::Int(500));
        assert_eq!(opts.get("autofree").unwrap(), OptionValue::Bool(false));
        assert_eq!(
            opts.get("portability").unwrap(),
            OptionValue::Portability(Portability::NONE)
        );
        assert_eq!(opts.seqname_format, "%s_seq");
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut opts = Options::default();
        let err = opts.set("optimize", OptionValue::Bool(true)).unwrap_err();
        assert!(err.is(ErrorCode::Error));
        assert_eq!(err.user_info(), Some("unknown option optimize"));
        assert!(opts.get("optimize").is_err());
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn wrong_type_is_mismatch() {
        let mut opts = Options::default();
        let err = opts.set("debug", OptionValue::Bool(true)).unwrap_err();
        assert!(err.is(ErrorCode::Mismatch));
    }

    #[test]
    fn set_then_get() {
        let mut opts = Options::default();
        opts.set("debug", 2i64.into()).unwrap();
        opts.set("portability", Portability::RTRIM.into()).unwrap();
        assert_eq!(opts.get("debug").unwrap(), OptionValue::Int(2));
        assert!(opts.portability.contains(Portability::RTRIM));
    }

    #[test]
    fn out_of_range_portability_is_rejected() {
        let mut opts = Options::default();
        opts.set("portability", Portability::RTRIM.into()).unwrap();
        for bad in [-1i64, 64, i64::from(u32::MAX) + 1] {
            let err = opts.set("portability", OptionValue::Int(bad)).unwrap_err();
            assert!(err.is(ErrorCode::Mismatch), "{bad}");
        }
        assert_eq!(opts.portability, Portability::RTRIM);

        opts.set("portability", OptionValue::Int(63)).unwrap();
        assert_eq!(opts.portability, Portability::ALL);
        let err = Options::from_json_str(r#"{ "portability": 128 }"#).unwrap_err();
        assert!(err.is(ErrorCode::Mismatch));
    }

    #[test]
    fn sequence_names() {
        let mut opts = Options::default();
        assert_eq!(opts.sequence_name("user ids"), "user_ids_seq");
        assert_eq!(opts.sequence_name("app.orders-2"), "app.orders_2_seq");
        opts.seqname_format = "seq_%s_100%%".into();
        assert_eq!(opts.sequence_name("x"), "seq_x_100%");
    }

    #[test]
    fn json_rejects_unknown_keys() {
        assert!(Options::from_json_str(r#"{ "bogus": 1 }"#).is_err());
        let opts = Options::from_json_str(r#"{ "autofree": true }"#).unwrap();
        assert!(opts.autofree);
        assert_eq!(opts.result_buffering, 500);
    }
}
