//! `schema`: attribute listings for every resource and data source type.

use tabled::Tabled;

use lookprov_core::{Attribute, Provider, Schema};

use crate::cli::{GlobalOpts, OutputFormat, SchemaArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    type_name: &'static str,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: String,
    #[tabled(rename = "Type")]
    attr_type: String,
    #[tabled(rename = "Presence")]
    presence: String,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

fn attribute_rows(prefix: &str, attrs: &[Attribute], rows: &mut Vec<AttributeRow>) {
    for attr in attrs {
        let name = if prefix.is_empty() {
            attr.name.to_owned()
        } else {
            format!("{prefix}.{}", attr.name)
        };

        let mut flags = Vec::new();
        if attr.sensitive {
            flags.push("sensitive");
        }
        if attr.write_only {
            flags.push("write-only");
        }
        if attr.force_new {
            flags.push("force-new");
        }
        if attr.deprecated.is_some() {
            flags.push("deprecated");
        }

        rows.push(AttributeRow {
            name: name.clone(),
            attr_type: attr.attr_type.to_string(),
            presence: attr.presence.to_string(),
            flags: flags.join(", "),
            description: attr.description,
        });
        attribute_rows(&name, &attr.nested, rows);
    }
}

fn find(type_name: &str, data_source: bool) -> Result<Schema, CliError> {
    let schemas = Provider::schemas();
    let pool = if data_source {
        schemas.data_sources
    } else {
        schemas.resources
    };
    pool.into_iter()
        .find(|s| s.type_name == type_name)
        .ok_or_else(|| CliError::NotFound {
            resource_type: if data_source { "data source" } else { "resource type" }.into(),
            identifier: type_name.into(),
            list_command: "schema".into(),
        })
}

pub fn handle(args: &SchemaArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match &args.type_name {
        None => match global.output {
            OutputFormat::Table | OutputFormat::Plain => {
                let schemas = Provider::schemas();
                let rows: Vec<TypeRow> = schemas
                    .resources
                    .iter()
                    .map(|s| (s, "resource"))
                    .chain(schemas.data_sources.iter().map(|s| (s, "data source")))
                    .map(|(s, kind)| TypeRow {
                        type_name: s.type_name,
                        kind,
                        description: s.description,
                    })
                    .collect();
                if global.output == OutputFormat::Plain {
                    rows.iter()
                        .map(|r| format!("{} ({})", r.type_name, r.kind))
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    output::render_table(&rows)
                }
            }
            structured => output::render_single(structured, &Provider::schemas(), |_| String::new()),
        },
        Some(type_name) => {
            let schema = find(type_name, args.data_source)?;
            match global.output {
                OutputFormat::Table => {
                    let mut rows = Vec::new();
                    attribute_rows("", &schema.attributes, &mut rows);
                    let mut out = format!("{}: {}\n", schema.type_name, schema.description);
                    out.push_str(&output::render_table(&rows));
                    for group in &schema.exactly_one_of {
                        out.push_str(&format!("\nExactly one of: {}", group.join(", ")));
                    }
                    out
                }
                OutputFormat::Plain => {
                    let mut rows = Vec::new();
                    attribute_rows("", &schema.attributes, &mut rows);
                    rows.into_iter().map(|r| r.name).collect::<Vec<_>>().join("\n")
                }
                structured => output::render_single(structured, &schema, |_| String::new()),
            }
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn nested_setting_attributes_use_dotted_names() {
        let schema = find("looker_setting", false).unwrap();
        let mut rows = Vec::new();
        attribute_rows("", &schema.attributes, &mut rows);
        assert!(rows.iter().any(|r| r.name == "embed_config.embed_cookieless_v2"));
        assert!(rows.iter().any(|r| r.name == "id" && r.presence == "computed"));
    }

    #[test]
    fn folder_data_source_is_separate_from_resource() {
        let ds = find("looker_folder", true).unwrap();
        assert_eq!(ds.exactly_one_of, vec![vec!["id", "name"]]);
        assert!(find("looker_api_credentials", true).is_err());
    }
}
