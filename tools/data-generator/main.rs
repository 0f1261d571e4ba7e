use clap::Parser;
use kumiki::prelude::*;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

/// A CLI tool to generate random DSL documents by driving editor sessions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to write the generated documents to
    #[arg(short, long, default_value = "generated_dsl")]
    output: String,

    /// Number of documents to generate
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Number of random edit operations per document
    #[arg(long, default_value_t = 40)]
    steps: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const ENTITIES: &[&str] = &["Order", "Customer", "Invoice", "Shipment"];
const PROPERTIES: &[&str] = &["status", "total", "flag", "owner", "note"];
const PRODUCTS: &[&str] = &["billing", "mail.v2", "crm-sync", "audit log"];
const METHODS: &[&str] = &["charge", "send", "notify", "record"];
const VALUES: &[&str] = &["true", "0", "\"Shipped\"", "this.total * 2", "NOW()", "[1, 2]"];

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    fs::create_dir_all(&cli.output)?;
    println!(
        "Generating {} document(s) with {} edit(s) each...",
        cli.count, cli.steps
    );

    for index in 0..cli.count {
        let mode = if rng.random_bool(0.5) {
            DslMode::Rule
        } else {
            DslMode::Action
        };
        let mut session = EditorSession::new(mode, random_meta(&mut rng, mode, index));
        for _ in 0..cli.steps {
            random_edit(&mut rng, &mut session);
        }

        let file_name = format!("{}_{:03}.dsl", mode.to_string().to_lowercase(), index);
        let path = Path::new(&cli.output).join(file_name);
        fs::write(&path, format!("{}\n", session.generated_text()))?;
        println!(
            "-> {} ({} statement(s), {} precondition(s))",
            path.display(),
            session.statements().len(),
            session.preconditions().len()
        );
    }

    println!("Successfully generated documents in '{}'", cli.output);
    Ok(())
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn random_meta(rng: &mut StdRng, mode: DslMode, index: usize) -> EditorMeta {
    let entity = pick(rng, ENTITIES);
    match mode {
        DslMode::Rule => {
            let trigger = if rng.random_bool(0.7) {
                TriggerSpec::new("UPDATE", entity).on_property(pick(rng, PROPERTIES))
            } else {
                TriggerSpec::new("CREATE", entity)
            };
            EditorMeta::rule(format!("Generated{}", index), rng.random_range(1..=200), trigger)
        }
        DslMode::Action => {
            let mut meta = EditorMeta::action(format!("generated{}", index), entity)
                .with_description(format!("Generated \"{}\" action", entity));
            if rng.random_bool(0.5) {
                meta = meta.with_parameter(ActionParameter::required("reason", "String"));
            }
            meta
        }
    }
}

fn random_kind(rng: &mut StdRng, mode: DslMode) -> BlockKind {
    let entity = pick(rng, ENTITIES);
    let property = pick(rng, PROPERTIES);
    let choice = rng.random_range(0..if mode == DslMode::Action { 5 } else { 4 });
    match choice {
        0 => BlockKind::set(format!("this.{}", property), pick(rng, VALUES)),
        1 => BlockKind::trigger(entity, "recalculate", "this"),
        2 => BlockKind::for_each(
            "it",
            entity,
            rng.random_bool(0.5)
                .then(|| format!("it.{} != null", property)),
        ),
        3 => BlockKind::call(
            pick(rng, PRODUCTS),
            pick(rng, METHODS),
            vec![
                CallArg::new("target", "this.id"),
                CallArg::new(property, pick(rng, VALUES)),
            ],
        ),
        _ => BlockKind::precondition(
            format!("{}Check", property),
            format!("this.{} != null", property),
            rng.random_bool(0.5)
                .then(|| format!("{} is required", property)),
        ),
    }
}

fn random_edit(rng: &mut StdRng, session: &mut EditorSession) {
    let ids: Vec<BlockId> = session
        .statements()
        .walk()
        .iter()
        .map(|(_, b)| b.id)
        .collect();

    match rng.random_range(0..10) {
        0..=4 => {
            let containers: Vec<BlockId> = session
                .statements()
                .walk()
                .iter()
                .filter(|(_, b)| b.is_container())
                .map(|(_, b)| b.id)
                .collect();
            let parent = match containers.choose(rng) {
                Some(id) if rng.random_bool(0.5) => ParentRef::Block(*id),
                _ => ParentRef::Root,
            };
            let kind = random_kind(rng, session.mode());
            session.add(parent, kind);
        }
        5 | 6 => {
            if let Some(id) = ids.choose(rng) {
                session.update_field(*id, BlockField::Value, pick(rng, VALUES));
            }
        }
        7 => {
            if let Some(id) = ids.choose(rng) {
                session.remove(*id);
            }
        }
        _ => {
            if let (Some(a), Some(b)) = (ids.choose(rng), ids.choose(rng)) {
                session.reorder(*a, *b);
            }
        }
    }
}
