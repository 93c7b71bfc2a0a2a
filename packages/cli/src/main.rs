//! `hal-nav` — navigate a HAL+JSON API from the command line.
//!
//! Every command starts at the bookmark, optionally jumps to `--go PATH`,
//! then follows each `--follow REL` in order. Templated links along the way
//! are expanded with the `--var KEY=VALUE` pairs.
//!
//! - **`get`** — print the final resource's body as pretty JSON.
//! - **`links`** — print the final resource's links, one per line.
//!
//! Set `RUST_LOG=getting=debug` to see every fetch and navigation step.

use std::collections::HashMap;
use std::process;

use clap::{Args, Parser, Subcommand};
use getting::{Client, ClientConfig, Resource, SingleLinkEncoding};
use tracing_subscriber::EnvFilter;

/// hal-nav — follow HAL links by relation name
#[derive(Parser)]
#[command(name = "hal-nav", version, about, long_about = None)]
struct Cli {
    /// Entry-point URI every navigation starts from.
    #[arg(long, env = "GETTING_BOOKMARK", value_name = "URI")]
    bookmark: String,

    /// Media type sent as `Accept`.
    #[arg(long, env = "GETTING_ACCEPT", value_name = "TYPE")]
    accept: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "GETTING_TIMEOUT_SECS", value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// How `get` writes rels with a single link: object | array
    #[arg(long, env = "GETTING_HAL_SINGLE_LINK", value_name = "ENCODING")]
    single_link: Option<SingleLinkEncoding>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the body of the resource at the end of the navigation.
    ///
    /// Examples:
    ///   hal-nav --bookmark https://api.example.com/ get --follow orders
    ///   hal-nav --bookmark https://api.example.com/ get --follow find --var id=42
    Get {
        #[command(flatten)]
        nav: Navigation,
    },

    /// List the links of the resource at the end of the navigation.
    ///
    /// Prints `rel<TAB>uri<TAB>title` per link, templated links expanded
    /// with the given variables.
    Links {
        #[command(flatten)]
        nav: Navigation,

        /// Only print links with this rel.
        #[arg(long, value_name = "REL")]
        rel: Option<String>,
    },
}

#[derive(Args)]
struct Navigation {
    /// Start from this URI (resolved against the bookmark) instead of the bookmark.
    #[arg(long, value_name = "PATH")]
    go: Option<String>,

    /// Follow a link relation. Repeat to follow a chain: --follow a --follow b
    #[arg(long = "follow", value_name = "REL")]
    follow: Vec<String>,

    /// Template variable for templated links. Repeat for several.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,
}

impl Navigation {
    fn variables(&self) -> HashMap<String, String> {
        self.vars.iter().cloned().collect()
    }

    /// Walk from the bookmark to the final resource.
    fn walk(&self, client: &Client) -> getting::Result<Resource> {
        let vars = self.variables();
        let mut resource = client.go(self.go.as_deref().unwrap_or(""))?;
        for rel in &self.follow {
            resource = resource.follow_with(rel, &vars)?;
        }
        Ok(resource)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "getting=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(accept) = cli.accept {
        config.accept = accept;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    if let Some(encoding) = cli.single_link {
        config.hal.single_link = encoding;
    }

    let client = Client::builder(cli.bookmark.as_str())
        .config(config)
        .build()
        .unwrap_or_else(|e| fatal(&e.to_string()));
    tracing::debug!(bookmark = %client.bookmark(), "client ready");

    let result = match cli.command {
        Command::Get { nav } => print_body(&client, &nav),
        Command::Links { nav, rel } => print_links(&client, &nav, rel.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("hal-nav: {e}");
        process::exit(1);
    }
}

fn print_body(client: &Client, nav: &Navigation) -> getting::Result<()> {
    let mut resource = nav.walk(client)?;
    let bytes = resource.representation()?.to_bytes()?;
    // Every registered format is JSON-based; fall back to raw text otherwise.
    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        ),
        Err(_) => println!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}

fn print_links(client: &Client, nav: &Navigation, only: Option<&str>) -> getting::Result<()> {
    let vars = nav.variables();
    let mut resource = nav.walk(client)?;
    let representation = resource.representation()?;

    for (rel, links) in representation.links().iter() {
        if only.is_some_and(|wanted| wanted != rel) {
            continue;
        }
        for link in links {
            let target = link.expand(&vars)?;
            println!("{rel}\t{target}\t{}", link.title.as_deref().unwrap_or(""));
        }
    }
    Ok(())
}

/// Parse a `KEY=VALUE` template variable.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid variable {raw:?}: expected KEY=VALUE"))?;
    if key.is_empty() {
        return Err(format!("invalid variable {raw:?}: empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("hal-nav: {msg}");
    process::exit(2);
}
