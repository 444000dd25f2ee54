use std::path::Path;

use crate::logger::LogLevel;

/// Define a config struct together with its partial (all-optional) twin.
/// The first parameter is the struct name; every further parameter is a
/// `(field, type, partial_type, default)` tuple.
macro_rules! config {
    ($struct_name:ident, $( ($field:ident, $field_type:ty, $partial_field_type:ty, $default:expr) ),* $(,)?) => {
        paste::paste! {
            #[derive(Debug, Clone, serde::Serialize)]
            pub struct $struct_name {
                $(
                    $field: $field_type,
                )*
            }

            #[derive(Debug, Clone, serde::Deserialize)]
            pub struct [<Partial $struct_name>] {
                $(
                    #[serde(default)]
                    $field: $partial_field_type,
                )*
            }

            impl $struct_name {
                pub fn from_partial(partial: [<Partial $struct_name>]) -> Self {
                    Self {
                        $(
                            $field: partial.$field.into_or($default),
                        )*
                    }
                }

                pub fn from_file<P: AsRef<Path>>(file: P) -> anyhow::Result<Self> {
                    let content = std::fs::read_to_string(file)?;
                    let partial: [<Partial $struct_name>] = toml::from_str(&content)?;
                    Ok(Self::from_partial(partial))
                }

                pub fn from_optional_file(file: Option<String>) -> anyhow::Result<Self> {
                    match file {
                        Some(path) => Self::from_file(path),
                        None => Ok(Self::default()),
                    }
                }

                $(
                    pub fn [<with_ $field>](mut self, $field: $field_type) -> Self {
                        self.$field = $field;
                        self
                    }

                    pub fn [<set_ $field>](&mut self, $field: $field_type) {
                        self.$field = $field;
                    }

                    pub fn [<get_ $field>](&self) -> &$field_type {
                        &self.$field
                    }
                )*
            }

            impl Default for $struct_name {
                fn default() -> Self {
                    $struct_name {
                        $(
                            $field: $default,
                        )*
                    }
                }
            }

            impl IntoOr<$struct_name> for Option<[<Partial $struct_name>]> {
                fn into_or(self, or: $struct_name) -> $struct_name {
                    match self {
                        Some(partial) => $struct_name::from_partial(partial),
                        None => or,
                    }
                }
            }
        }
    };
}

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(value) => Some(value),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config!(LoggerConfig,
    (enabled, bool, Option<bool>, false),
    (log_file, bool, Option<bool>, false),
    (log_level, LogLevel, Option<LogLevel>, LogLevel::Warn)
);

config!(RenderConfig,
    (dot2tex_timeout, std::time::Duration, Option<std::time::Duration>, std::time::Duration::from_secs(5)),
    (latex_timeout, std::time::Duration, Option<std::time::Duration>, std::time::Duration::from_secs(10)),
    (work_dir, String, Option<String>, "./data/render".to_string())
);

config!(ServerConfig,
    (port, u16, Option<u16>, 8080),
    (store_dir, String, Option<String>, "./data/automata".to_string()),
    (artifact_dir, String, Option<String>, "./data/artifacts".to_string()),
    (logger, LoggerConfig, Option<PartialLoggerConfig>, LoggerConfig::default()),
    (render, RenderConfig, Option<PartialRenderConfig>, RenderConfig::default())
);

impl GeneralConfig for ServerConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}
