use vitrine_core::models::{form_layout, CustomField, FieldDescriptor, FieldKind, ResourceKind};
use vitrine_core::validation::RawInput;

const PROGRESS_WIDTH: usize = 20;

/// One line describing `field` and its current value.
pub fn render_field(field: &FieldDescriptor, value: Option<&str>) -> String {
    let shown = match value.filter(|v| !v.is_empty()) {
        Some(value) => value.to_string(),
        None => format!("<{}>", field.placeholder),
    };

    match &field.kind {
        FieldKind::PlainText => format!("{}: {}", field.label, shown),
        FieldKind::MultiLineText { rows } => {
            format!("{} ({} lines): {}", field.label, rows, shown)
        }
        FieldKind::EnumeratedChoice { options } => {
            format!("{} [{}]: {}", field.label, options.join("|"), shown)
        }
        FieldKind::Custom(CustomField::AssetPicker(media)) => {
            format!("{} ({} file): {}", field.label, media, shown)
        }
    }
}

/// The whole form of `kind`, one field per line.
pub fn render_form(kind: ResourceKind, input: &RawInput) -> String {
    form_layout(kind)
        .iter()
        .map(|field| render_field(field, input.get(field.name)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text progress bar, e.g. `[##########..........]  50%`.
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}


/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
