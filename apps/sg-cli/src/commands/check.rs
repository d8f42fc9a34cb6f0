// check.rs — `sg check`: run type names through a policy file.
//
// Each name goes through the name-bound channel, exactly as the engine
// would check a type reference in a template. Output is one line per name
// (`ALLOW com.acme.SuperCar`), or one JSON trace per name with `--trace`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sg_gate::AccessGate;
use sg_policy::PolicyConfig;
use sg_types::TypeName;

#[derive(Args)]
pub struct CheckArgs {
    /// Policy file (.toml, .yaml or .yml).
    #[arg(long)]
    pub policy: PathBuf,
    /// Host type table; without it every type is treated as a root.
    #[arg(long)]
    pub types: Option<PathBuf>,
    /// Print a JSON trace per type instead of a verdict line.
    #[arg(long)]
    pub trace: bool,
    /// Fully qualified type names to check.
    #[arg(required = true)]
    pub type_names: Vec<String>,
}

/// Returns `false` if any type was denied.
pub fn execute(args: &CheckArgs) -> anyhow::Result<bool> {
    let gate = build_gate(args)?;
    let (lines, all_allowed) = render(&gate, &args.type_names, args.trace)?;
    for line in lines {
        println!("{}", line);
    }
    Ok(all_allowed)
}

fn build_gate(args: &CheckArgs) -> anyhow::Result<AccessGate> {
    let resolver = super::load_resolver(args.types.as_deref())?;
    let config = PolicyConfig::from_file(&args.policy)
        .with_context(|| format!("loading policy from {}", args.policy.display()))?;
    tracing::debug!(
        policy = %args.policy.display(),
        filters = config.filters.len(),
        "loaded policy"
    );
    let gate = AccessGate::from_policy(&config, resolver)
        .context("building filters from policy")?;
    Ok(gate)
}

fn render(
    gate: &AccessGate,
    type_names: &[String],
    trace: bool,
) -> anyhow::Result<(Vec<String>, bool)> {
    let mut lines = Vec::with_capacity(type_names.len());
    let mut all_allowed = true;
    for raw in type_names {
        let name = TypeName::from(raw.as_str());
        if trace {
            let gate_trace = gate.check_type_resolution_with_trace(&name);
            all_allowed &= gate_trace.verdict.is_allowed();
            lines.push(serde_json::to_string(&gate_trace)?);
        } else {
            let verdict = gate.check_type_resolution(&name);
            all_allowed &= verdict.is_allowed();
            let label = if verdict.is_allowed() { "ALLOW" } else { "DENY" };
            lines.push(format!("{} {}", label, name));
        }
    }
    Ok((lines, all_allowed))
}
