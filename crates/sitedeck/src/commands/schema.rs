//! Schema command handler: the form each schema document produces.

use tabled::Tabled;

use sitedeck_core::{FieldKind, FormField, SiteManager};

use crate::cli::{GlobalOpts, SchemaArgs, SchemaTarget};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&FormField> for FieldRow {
    fn from(f: &FormField) -> Self {
        Self {
            name: f.name.clone(),
            title: f.title.clone(),
            kind: kind_label(&f.kind),
            required: if f.required { "yes".into() } else { String::new() },
            description: f.description.clone().unwrap_or_default(),
        }
    }
}

fn kind_label(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Enum(values) => format!("enum({})", values.join(" | ")),
        FieldKind::Integer { minimum: Some(min) } => format!("integer (>= {min})"),
        other => other.to_string(),
    }
}

pub async fn handle(
    manager: &SiteManager,
    args: SchemaArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = manager.session();
    let (doc, form) = match args.target {
        SchemaTarget::Site => (session.site_schema().await?, session.site_form().await?),
        SchemaTarget::Global => (session.global_schema().await?, session.global_form().await?),
    };

    let rows: Vec<FieldRow> = form.fields().iter().map(FieldRow::from).collect();
    let out = output::render_single(
        &global.output,
        doc.as_ref(),
        |_| output::render_table(&rows),
        |_| {
            form.fields()
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
