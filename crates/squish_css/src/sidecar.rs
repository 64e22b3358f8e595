use crate::rename::{RenameTable, RenameTables};
use itertools::Itertools;
use serde_json::{Map, Value};
use squish_config::Config;

fn resolved(entry: &crate::rename::IdentInfo) -> &str {
    if entry.replacement.is_empty() {
        &entry.original
    } else {
        &entry.replacement
    }
}

fn table_object(table: &RenameTable, defined_only: bool) -> Map<String, Value> {
    let mut object = Map::new();

    for entry in table.iter() {
        if defined_only && !entry.defined {
            continue;
        }
        object.insert(
            entry.original.clone(),
            Value::String(resolved(entry).to_string()),
        );
    }

    object
}

/// The JSON sidecar map: one object per non-empty rename table, keyed by the
/// configured object names. Custom-property and animation objects only list
/// names the stylesheet defined. Returns None when there is nothing to
/// export.
#[must_use]
pub fn json_sidecar(cfg: &Config, tables: &RenameTables) -> Option<String> {
    let mut root = Map::new();

    let sections = [
        (&cfg.json_id_object_name, &tables.ids, false),
        (&cfg.json_class_object_name, &tables.classes, false),
        (&cfg.json_cprop_object_name, &tables.custom_properties, true),
        (&cfg.json_animation_object_name, &tables.animations, true),
    ];

    for (name, table, defined_only) in sections {
        if table.is_empty() {
            continue;
        }

        let object = table_object(table, defined_only);
        if !object.is_empty() {
            root.insert(name.clone(), Value::Object(object));
        }
    }

    if root.is_empty() {
        return None;
    }

    Some(Value::Object(root).to_string())
}

/// The PHP include variant: `<?php $ids=array('orig'=>'short', …); ?>` with
/// one array per non-empty table.
#[must_use]
pub fn php_sidecar(cfg: &Config, tables: &RenameTables) -> Option<String> {
    let sections = [
        (&cfg.php_id_array_name, &tables.ids, false),
        (&cfg.php_class_array_name, &tables.classes, false),
        (&cfg.php_cprop_array_name, &tables.custom_properties, true),
        (&cfg.php_animation_array_name, &tables.animations, true),
    ];

    let mut arrays = Vec::new();

    for (name, table, defined_only) in sections {
        if table.is_empty() {
            continue;
        }

        let pairs = table
            .iter()
            .filter(|entry| !defined_only || entry.defined)
            .map(|entry| format!("'{}'=>'{}'", entry.original, resolved(entry)))
            .join(",");

        if !pairs.is_empty() {
            arrays.push(format!("${name}=array({pairs});"));
        }
    }

    if arrays.is_empty() {
        return None;
    }

    Some(format!("<?php {} ?>", arrays.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::ShortIdCounter;

    fn tables() -> RenameTables {
        let mut tables = RenameTables::default();
        tables.ids.intern("header", true);
        tables.classes.intern("button", true);
        tables.classes.intern("button-primary", true);
        tables.custom_properties.intern("pad", true);
        tables.custom_properties.intern("ghost", false);

        let mut counter = ShortIdCounter::new();
        tables.ids.generate(&mut counter);
        let mut counter = ShortIdCounter::new();
        tables.classes.generate(&mut counter);
        let mut counter = ShortIdCounter::new();
        tables.custom_properties.generate(&mut counter);

        tables
    }

    #[test]
    fn json_sidecar_lists_defined_names() {
        let cfg = Config::default();
        let json = json_sidecar(&cfg, &tables()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["ids"]["header"], "a");
        assert_eq!(value["classes"]["button"], "a");
        assert_eq!(value["classes"]["button-primary"], "b");
        assert_eq!(value["cprops"]["pad"], "a");
        // Referenced but never defined: renamed, reported, not exported
        assert!(value["cprops"].get("ghost").is_none());
        // Empty tables omit their key
        assert!(value.get("anims").is_none());
    }

    #[test]
    fn json_sidecar_is_none_when_empty() {
        let cfg = Config::default();
        assert!(json_sidecar(&cfg, &RenameTables::default()).is_none());
    }

    #[test]
    fn php_sidecar_format() {
        let cfg = Config {
            php_id_array_name: "ids".to_string(),
            php_class_array_name: "classes".to_string(),
            php_cprop_array_name: "cprops".to_string(),
            php_animation_array_name: "anims".to_string(),
            ..Config::default()
        };

        let php = php_sidecar(&cfg, &tables()).unwrap();

        assert!(php.starts_with("<?php "));
        assert!(php.ends_with(" ?>"));
        assert!(php.contains("$ids=array('header'=>'a');"));
        assert!(php.contains("'button'=>'a'"));
        assert!(!php.contains("ghost"));
    }
}
