//! Run a SELECT query against a SPARQL endpoint and print the solutions.
//!
//! ```text
//! RUST_LOG=debug cargo run --example query_endpoint -- \
//!     http://localhost:3030/ds/sparql "SELECT * WHERE { ?s ?p ?o } LIMIT 5"
//! ```
//!
//! Digest credentials are read from `SPARQL_USER` / `SPARQL_PASSWORD`.

use sparql_repo::client::{digest_auth, timeout};
use sparql_repo::{Repo, RepoOption, SparqlClient};
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let endpoint = args
        .next()
        .unwrap_or_else(|| "http://localhost:3030/ds/sparql".to_string());
    let query = args
        .next()
        .unwrap_or_else(|| "SELECT * WHERE { ?s ?p ?o } LIMIT 10".to_string());

    let mut options: Vec<RepoOption> = vec![timeout(Duration::from_secs(30))];
    if let (Ok(user), Ok(password)) = (std::env::var("SPARQL_USER"), std::env::var("SPARQL_PASSWORD")) {
        options.push(digest_auth(user, password));
    }

    let repo = match Repo::open(&endpoint, options) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(2);
        }
    };

    match repo.query(&query).await {
        Ok(result) => {
            println!("Variables: {}", result.variables().join(", "));
            for (i, solution) in result.solutions().iter().enumerate() {
                let cells: Vec<String> = solution
                    .iter()
                    .map(|(var, term)| format!("?{} = {}", var, term))
                    .collect();
                println!("{:>4}: {}", i + 1, cells.join("  "));
            }
            println!("✓ {} solutions", result.len());
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}
