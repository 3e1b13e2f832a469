//! Parse command - extract an operation from a single fax text file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, ValueEnum};
use console::style;
use encoding_rs::Encoding;
use tracing::{debug, info, warn};

use alarmfax_core::fax::generic::GENERIC_ALIAS;
use alarmfax_core::models::config::{InputConfig, OutputConfig};
use alarmfax_core::{AlarmfaxConfig, ExtractionResult, GenericParser, Operation, ParserRegistry};

use super::config::load_config;

const FORM_FEED: char = '\u{c}';
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (OCR text of one fax)
    #[arg(required = true)]
    input: PathBuf,

    /// Parser alias (default: from config)
    #[arg(short, long)]
    parser: Option<String>,

    /// Generic layout definition (JSON); selects the generic parser
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Include lines that failed to parse
    #[arg(long)]
    warnings: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// The explicit choice, or the format named in the configuration.
    pub fn resolve(explicit: Option<Self>, configured: &str) -> anyhow::Result<Self> {
        match explicit {
            Some(format) => Ok(format),
            None => <Self as ValueEnum>::from_str(configured, true)
                .map_err(|_| anyhow::anyhow!("Unsupported output format in config: {}", configured)),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let format = OutputFormat::resolve(args.format, &config.output.format)?;
    let (registry, alias) =
        select_parser(args.parser.as_deref(), args.layout.as_deref(), &config)?;
    let parser = registry.get(&alias)?;

    info!("Parsing {} with {}", args.input.display(), parser.alias());

    let text = decode_fax(&fs::read(&args.input)?, &config.input)?;
    let lines = fax_lines(&text);
    debug!("Fax has {} lines", lines.len());

    let result = parser.parse(&lines);

    let include_warnings = args.warnings || config.output.include_warnings;
    let output = format_result(&result, format, &config.output, include_warnings)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    // JSON carries the warnings itself
    if include_warnings && format != OutputFormat::Json && !result.warnings.is_empty() {
        eprintln!("{}", style("Lines that could not be parsed:").yellow());
        for warning in &result.warnings {
            eprintln!("  - line {}: {}", warning.line, warning.message);
        }
    }

    debug!(
        "Parsed in {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}

/// Build the registry and pick the alias to parse with.
///
/// An explicit `--parser` wins. A layout file alone selects the generic
/// parser. Otherwise the configured alias is used.
pub fn select_parser(
    parser: Option<&str>,
    layout: Option<&Path>,
    config: &AlarmfaxConfig,
) -> anyhow::Result<(ParserRegistry, String)> {
    let alias = match (parser, layout) {
        (Some(alias), _) => alias.to_string(),
        (None, Some(_)) => GENERIC_ALIAS.to_string(),
        (None, None) => config.parser.alias.clone(),
    };

    let mut registry = ParserRegistry::new();
    match layout.or(config.parser.layout_file.as_deref()) {
        Some(path) => {
            debug!("Loading generic layout from {}", path.display());
            registry.register(Box::new(GenericParser::from_file(path)?));
        }
        None if alias == GENERIC_ALIAS => {
            anyhow::bail!(
                "{} needs a layout definition. Pass --layout or set parser.layout_file.",
                GENERIC_ALIAS
            );
        }
        None => {}
    }

    Ok((registry, alias))
}

/// Decode a fax text file, falling back to the configured legacy encoding
/// when the bytes are not UTF-8.
pub fn decode_fax(bytes: &[u8], input: &InputConfig) -> anyhow::Result<String> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let encoding = Encoding::for_label(input.fallback_encoding.as_bytes())
                .ok_or_else(|| anyhow::anyhow!("Unknown encoding: {}", input.fallback_encoding))?;
            debug!("Input is not UTF-8, decoding as {}", encoding.name());

            let (text, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                warn!("Input contains bytes that are invalid in {}", encoding.name());
            }
            text.into_owned()
        }
    };

    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&text);
    Ok(if input.strip_form_feeds {
        text.replace(FORM_FEED, "")
    } else {
        text.to_string()
    })
}

pub fn fax_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    output: &OutputConfig,
    include_warnings: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let value = if include_warnings {
                serde_json::to_value(result)?
            } else {
                serde_json::to_value(&result.operation)?
            };
            if output.pretty {
                Ok(serde_json::to_string_pretty(&value)?)
            } else {
                Ok(serde_json::to_string(&value)?)
            }
        }
        OutputFormat::Csv => format_csv(&result.operation),
        OutputFormat::Text => Ok(format_text(&result.operation)),
    }
}

pub const CSV_HEADER: [&str; 16] = [
    "operation_number",
    "timestamp",
    "keyword",
    "emergency_keyword",
    "keyword_b",
    "keyword_r",
    "keyword_s",
    "keyword_t",
    "street",
    "street_number",
    "zip_code",
    "city",
    "property",
    "messenger",
    "comment",
    "resources",
];

/// One CSV row in [`CSV_HEADER`] order.
pub fn csv_record(operation: &Operation) -> Vec<String> {
    let location = &operation.einsatzort;
    vec![
        operation.operation_number.clone(),
        operation.timestamp.format("%d.%m.%Y %H:%M:%S").to_string(),
        operation.keywords.keyword.clone(),
        operation.keywords.emergency_keyword.clone(),
        operation.keywords.b.clone(),
        operation.keywords.r.clone(),
        operation.keywords.s.clone(),
        operation.keywords.t.clone(),
        location.street.clone(),
        location.street_number.clone(),
        location.zip_code.clone(),
        location.city.clone(),
        location.property.clone(),
        operation.messenger.clone(),
        operation.comment.clone(),
        operation.resources.to_string(),
    ]
}

fn format_csv(operation: &Operation) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_record(operation))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(operation: &Operation) -> String {
    let mut output = String::new();

    output.push_str(&format!("Operation: {}\n", operation.operation_number));
    output.push_str(&format!(
        "Time: {}\n",
        operation.timestamp.format("%d.%m.%Y %H:%M:%S")
    ));
    let keywords = operation.keywords.to_string();
    if !keywords.is_empty() {
        output.push_str(&format!("Keywords: {}\n", keywords));
    }
    output.push('\n');

    output.push_str("Location:\n");
    output.push_str(&format!("  {}\n", operation.einsatzort));
    if !operation.einsatzort.property.is_empty() {
        output.push_str(&format!("  Property: {}\n", operation.einsatzort.property));
    }
    if let Some(lat_lng) = operation.einsatzort.geo_lat_lng() {
        output.push_str(&format!("  Coordinates: {}\n", lat_lng));
    }

    if operation.zielort.is_meaningful() || !operation.zielort.location.is_empty() {
        output.push_str("\nDestination:\n");
        output.push_str(&format!("  {}\n", operation.zielort));
    }

    for (label, value) in [
        ("Messenger", &operation.messenger),
        ("Picture", &operation.picture),
        ("Comment", &operation.comment),
        ("Operation plan", &operation.operation_plan),
    ] {
        if !value.is_empty() {
            output.push_str(&format!("\n{}:\n", label));
            for line in value.lines() {
                output.push_str(&format!("  {}\n", line));
            }
        }
    }

    if !operation.resources.is_empty() {
        output.push_str("\nResources:\n");
        for resource in operation.resources.iter() {
            output.push_str(&format!("  - {}", resource.full_name));
            if !resource.timestamp.is_empty() {
                output.push_str(&format!(" [{}]", resource.timestamp));
            }
            if !resource.requested_equipment.is_empty() {
                output.push_str(&format!(" ({})", resource.requested_equipment.join(", ")));
            }
            output.push('\n');
        }
    }

    if !operation.custom_data.is_empty() {
        output.push_str("\nCustom data:\n");
        for (key, value) in &operation.custom_data {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarmfax_core::OperationResource;
    use chrono::NaiveDate;

    fn operation() -> Operation {
        let received = NaiveDate::from_ymd_opt(2020, 3, 5)
            .unwrap()
            .and_hms_opt(14, 40, 0)
            .unwrap();
        let mut operation = Operation::new(received);
        operation.operation_number = "T 1.2 200305 17".to_string();
        operation.keywords.b = "B 3".to_string();
        operation.einsatzort.street = "Kirchweg".to_string();
        operation.einsatzort.street_number = "5".to_string();
        operation.einsatzort.zip_code = "12345".to_string();
        operation.einsatzort.city = "Beispielstadt".to_string();
        operation.comment = "Zufahrt Nord\nTor 3".to_string();
        operation
            .resources
            .push(OperationResource::new("FL MUS 40/1").with_equipment("DLK 23/12"));
        operation
    }

    #[test]
    fn test_decode_utf8_strips_bom_and_form_feeds() {
        let text = decode_fax("\u{feff}EINSATZORT\n\u{c}ORT: Süd".as_bytes(), &InputConfig::default())
            .unwrap();
        assert_eq!(text, "EINSATZORT\nORT: Süd");
    }

    #[test]
    fn test_decode_falls_back_to_legacy_encoding() {
        let text = decode_fax(b"Stra\xdfe: M\xfchlweg 5", &InputConfig::default()).unwrap();
        assert_eq!(text, "Straße: Mühlweg 5");
    }

    #[test]
    fn test_decode_unknown_encoding() {
        let input = InputConfig {
            fallback_encoding: "no-such-encoding".to_string(),
            ..InputConfig::default()
        };
        assert!(decode_fax(b"\xff\xfe\xfd", &input).is_err());
        assert!(decode_fax(b"ascii", &input).is_ok());
    }

    #[test]
    fn test_fax_lines_handles_crlf() {
        assert_eq!(fax_lines("A\r\nB\n\nC"), vec!["A", "B", "", "C"]);
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(OutputFormat::resolve(None, "Text").unwrap(), OutputFormat::Text);
        assert_eq!(
            OutputFormat::resolve(Some(OutputFormat::Csv), "json").unwrap(),
            OutputFormat::Csv
        );
        assert!(OutputFormat::resolve(None, "xml").is_err());
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&operation()).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("operation_number,timestamp,keyword,"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("T 1.2 200305 17,05.03.2020 14:40:00,,,B 3,"));
        assert!(row.contains("Kirchweg,5,12345,Beispielstadt"));
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&operation());
        assert!(text.starts_with("Operation: T 1.2 200305 17\nTime: 05.03.2020 14:40:00\n"));
        assert!(text.contains("Keywords: B: B 3\n"));
        assert!(text.contains("Comment:\n  Zufahrt Nord\n  Tor 3\n"));
        assert!(text.contains("  - FL MUS 40/1 (DLK 23/12)\n"));
        assert!(!text.contains("Destination"));
    }
}
