//! Form Walkthrough Demo
//!
//! Loads a survey definition, then changes answers and edits a recurring
//! group while printing the derived state of every field.
//! Set `RUST_LOG=formstate_core=debug` to see the engine's logging.

use formstate_core::{FormState, NodeRef, Value};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SURVEY: &str = include_str!("../forms/survey.ron");

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    println!("=== Formstate Walkthrough ===\n");

    let loaded = match formstate_script::load_str(SURVEY) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load survey: {}", e);
            std::process::exit(1);
        }
    };
    let mut state = match loaded.builder().into_state() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Survey data does not match its definition: {}", e);
            std::process::exit(1);
        }
    };

    println!("Initial state (question1 = 5):");
    print_tree(state.root(), 1);

    if let Err(e) = run(&mut state) {
        eprintln!("Walkthrough failed: {}", e);
        std::process::exit(1);
    }

    println!("\nFinal form data:");
    println!("  {}", state.form());
    println!("\n=== Walkthrough Complete ===");
}

fn run(state: &mut FormState) -> formstate_core::Result<()> {
    println!("\nSetting question1 = 3...");
    state.set_value("question1", 3i64)?;
    print_tree(state.root(), 1);

    println!("\nAppending two recurring group entries...");
    for (answer, number) in [("first", 1i64), ("second", 2)] {
        state.append("recurringGroup", entry(answer, number))?;
    }
    print_tree(state.root(), 1);

    println!("\nInserting an entry at index 0...");
    state.insert("recurringGroup", 0, entry("inserted", 0))?;
    print_tree(state.root(), 1);

    println!("\nRemoving the entry at index 0...");
    let removed = state.remove("recurringGroup", 0)?;
    println!("  Removed: {}", removed);
    print_tree(state.root(), 1);

    println!("\nMaking question2 required from now on...");
    state.required_when("question2", true)?;
    state.set_value("question1", 7i64)?;
    print_tree(state.root(), 1);
    Ok(())
}

fn entry(answer: &str, number: i64) -> Value {
    [
        ("question4", Value::from(answer)),
        (
            "group2",
            [("question5", Value::Int(number))].into_iter().collect(),
        ),
    ]
    .into_iter()
    .collect()
}

fn print_tree(node: NodeRef<'_>, depth: usize) {
    let mut children: Vec<NodeRef<'_>> = node.fields().into_iter().map(|(_, n)| n).collect();
    children.extend(node.elements());
    for child in children {
        let value = match child.value() {
            Some(value) if child.is_empty() => format!(" = {}", value),
            _ => String::new(),
        };
        println!(
            "{}{}{} [active: {}, required: {}]",
            "  ".repeat(depth),
            child.display_path(),
            value,
            child.is_active(),
            child.is_required()
        );
        print_tree(child, depth + 1);
    }
}
