//! Parameters loaded from TOML documents
//!
//! Nested tables flatten into dotted keys, so
//!
//! ```toml
//! [db]
//! host = "localhost"
//! ```
//!
//! becomes the parameter `db.host`.

use crate::container::{Container, Entry};
use crate::error::Result;
use toml::{Table, Value as TomlValue};
use tracing::debug;

/// Parse a TOML document into container entries
pub fn parse_toml(src: &str) -> Result<Vec<(String, Entry)>> {
    let table: Table = src.parse()?;
    let mut entries = Vec::new();
    flatten(None, table, &mut entries);
    Ok(entries)
}

fn flatten(prefix: Option<&str>, table: Table, out: &mut Vec<(String, Entry)>) {
    for (name, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name,
        };
        match value {
            TomlValue::Table(nested) => flatten(Some(key.as_str()), nested, out),
            TomlValue::String(s) => out.push((key, Entry::value(s))),
            TomlValue::Integer(i) => out.push((key, Entry::value(i))),
            TomlValue::Float(f) => out.push((key, Entry::value(f))),
            TomlValue::Boolean(b) => out.push((key, Entry::value(b))),
            TomlValue::Datetime(dt) => out.push((key, Entry::value(dt))),
            TomlValue::Array(items) => out.push((key, Entry::value(items))),
        }
    }
}

impl Container {
    /// Create a container holding the parameters of a TOML document
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(Self::with_values(parse_toml(src)?))
    }

    /// Load parameters from a TOML document, overwriting existing keys
    pub fn load_toml(&self, src: &str) -> Result<()> {
        let entries = parse_toml(src)?;
        debug!(count = entries.len(), "loading parameters");
        for (key, entry) in entries {
            self.set(key, entry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContainerError;
    use toml::value::{Array, Datetime};

    const DOC: &str = r#"
name = "xpto"
age = 19
ratio = 0.5
debug = true
started = 1979-05-27T07:32:00Z
ports = [8080, 8081]

[db]
host = "localhost"

[db.pool]
size = 4
"#;

    #[test]
    fn test_flattens_tables() {
        let c = Container::from_toml(DOC).unwrap();
        assert_eq!(
            c.keys(),
            vec![
                "age",
                "db.host",
                "db.pool.size",
                "debug",
                "name",
                "ports",
                "ratio",
                "started"
            ]
        );
        assert_eq!(c.get_as::<String>("db.host").unwrap().as_str(), "localhost");
        assert_eq!(*c.get_as::<i64>("db.pool.size").unwrap(), 4);
    }

    #[test]
    fn test_scalar_types() {
        let c = Container::from_toml(DOC).unwrap();
        assert_eq!(c.get_as::<String>("name").unwrap().as_str(), "xpto");
        assert_eq!(*c.get_as::<i64>("age").unwrap(), 19);
        assert_eq!(*c.get_as::<f64>("ratio").unwrap(), 0.5);
        assert!(*c.get_as::<bool>("debug").unwrap());
        assert!(c.get_as::<Datetime>("started").is_ok());
        assert_eq!(c.get_as::<Array>("ports").unwrap().len(), 2);
    }

    #[test]
    fn test_load_overwrites() {
        let c = Container::new();
        c.set_service("age", |_| Ok(1_i64));
        assert_eq!(*c.get_as::<i64>("age").unwrap(), 1);

        c.load_toml("age = 19").unwrap();
        assert_eq!(*c.get_as::<i64>("age").unwrap(), 19);
        assert!(!c.raw("age").unwrap().is_service());
    }

    #[test]
    fn test_invalid_document() {
        let err = Container::from_toml("age = ").err().unwrap();
        assert!(matches!(err, ContainerError::Config(_)));
    }
}
