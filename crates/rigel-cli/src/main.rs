use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rigel_constant::{
    ConstantNode, ConstantValue, ConstantValueKind, NumericValue, TargetType, Value,
};
use rigel_js::{JsModule, JsNode};
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "rigel", version, about = "Rigel CLI (constant-model inspection for JS sources)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every top-level constant of a module
    Dump(DumpArgs),
    /// Resolve one constant, optionally navigating into it
    Get(GetArgs),
}

#[derive(Args)]
struct DumpArgs {
    /// Path to a JavaScript file
    path: PathBuf,
    /// Emit JSON suitable for scripting
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GetArgs {
    /// Path to a JavaScript file
    path: PathBuf,
    /// Top-level constant name
    name: String,
    /// JSON pointer into the constant, e.g. `/fields/0/id`
    #[arg(long)]
    pointer: Option<String>,
    /// Convert to a target type (`string`, `bool`, `int32`, `int64`,
    /// `float32`, `float64`, `decimal`, `bigint`, `object`, `class`;
    /// append `[]` for arrays)
    #[arg(long = "as", value_name = "TYPE")]
    target: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Dump(args) => dump(&args),
        Command::Get(args) => get(&args),
    }
}

#[derive(Serialize)]
struct DumpEntry {
    name: String,
    kind: ConstantValueKind,
    value: serde_json::Value,
}

fn load_module(path: &Path) -> Result<JsModule> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    JsModule::parse(source).context("failed to parse JavaScript")
}

fn dump(args: &DumpArgs) -> Result<()> {
    let module = load_module(&args.path)?;
    let entries = dump_entries(&module);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in entries {
            println!("{} [{:?}] = {}", entry.name, entry.kind, entry.value);
        }
    }
    Ok(())
}

fn dump_entries(module: &JsModule) -> Vec<DumpEntry> {
    module
        .constants()
        .into_iter()
        .map(|(name, value)| DumpEntry {
            name,
            kind: value.kind(),
            value: render(&value),
        })
        .collect()
}

fn get(args: &GetArgs) -> Result<()> {
    let module = load_module(&args.path)?;
    let mut value = module
        .constant(&args.name)
        .with_context(|| format!("no top-level constant named `{}`", args.name))?;

    if let Some(pointer) = &args.pointer {
        let object = value
            .as_object_literal()
            .context("--pointer requires an object-literal constant")?;
        value = object
            .find(pointer)
            .with_context(|| format!("nothing at pointer `{pointer}`"))?;
    }

    let rendered = match &args.target {
        Some(target) => {
            let target = parse_target(target)?;
            match value.convert_to(&target)? {
                Some(converted) => render_converted(&converted),
                None => bail!("value of kind {:?} is not convertible to the requested type", value.kind()),
            }
        }
        None => render(&value),
    };
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn parse_target(text: &str) -> Result<TargetType> {
    if let Some(element) = text.strip_suffix("[]") {
        return Ok(TargetType::array_of(parse_target(element)?));
    }
    let target = match text {
        "string" => TargetType::String,
        "bool" => TargetType::Bool,
        "int32" => TargetType::Int32,
        "int64" => TargetType::Int64,
        "float32" => TargetType::Float32,
        "float64" => TargetType::Float64,
        "decimal" => TargetType::Decimal,
        "bigint" => TargetType::BigInt,
        "object" => TargetType::ObjectLiteral,
        "class" => TargetType::ClassReference,
        "value" => TargetType::Value,
        other => bail!("unknown target type `{other}`"),
    };
    Ok(target)
}

/// Render a constant by its classified kind, without a requested target.
fn render(value: &ConstantValue<JsNode<'_>>) -> serde_json::Value {
    match value.kind() {
        ConstantValueKind::String => json!(value.as_string()),
        ConstantValueKind::Boolean => json!(value.as_bool()),
        ConstantValueKind::Numeric => match value.numeric_value() {
            Some(NumericValue::Int(v)) => json!(v),
            Some(NumericValue::Float(v)) => json!(v),
            // JSON numbers cap at the double range; keep big integers exact
            // as strings.
            Some(NumericValue::BigInt(v)) => json!(v.to_string()),
            None => serde_json::Value::Null,
        },
        ConstantValueKind::Array => {
            let elements = value
                .node()
                .and_then(|node| node.elements())
                .unwrap_or_default();
            json!(elements
                .into_iter()
                .map(|element| render(&ConstantValue::of(element)))
                .collect::<Vec<_>>())
        }
        ConstantValueKind::ObjectLiteral => match value.as_object_literal() {
            Some(object) => {
                let mut map = serde_json::Map::new();
                for (name, property) in object.properties() {
                    map.insert(name.clone(), render(property));
                }
                serde_json::Value::Object(map)
            }
            None => serde_json::Value::Null,
        },
        ConstantValueKind::ClassReference => {
            json!({ "$class": value.as_class().map(|class| class.name) })
        }
        ConstantValueKind::Unknown => serde_json::Value::Null,
    }
}

fn render_converted(value: &Value<JsNode<'_>>) -> serde_json::Value {
    match value {
        Value::String(v) => json!(v),
        Value::Bool(v) => json!(v),
        Value::Int32(v) => json!(v),
        Value::Int64(v) => json!(v),
        Value::Float32(v) => json!(v),
        Value::Float64(v) => json!(v),
        Value::Decimal(v) => json!(v.to_string()),
        Value::BigInt(v) => json!(v.to_string()),
        Value::Class(class) => json!({ "$class": class.name }),
        Value::Object(object) => {
            let mut map = serde_json::Map::new();
            for (name, property) in object.properties() {
                map.insert(name.clone(), render(property));
            }
            serde_json::Value::Object(map)
        }
        Value::Array(slots) => json!(slots
            .iter()
            .map(|slot| slot
                .as_ref()
                .map(render_converted)
                .unwrap_or(serde_json::Value::Null))
            .collect::<Vec<_>>()),
        Value::Constant(constant) => render(constant),
    }
}
