// ABOUTME: CLI binary: fetch-or-read a page, run extraction, print YAML front matter + HTML.
// ABOUTME: Ports the Go command's flag surface: -d debug letters, -parse dump-and-exit.

use std::cell::RefCell;
use std::fs;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use dom_query::Document;

use digests_arts::config::ConfigBuilder;
use digests_arts::logger::DebugSinks;
use digests_arts::resource::{fetch, first_response_record, FetchOptions};
use digests_arts::{extract, formats};

#[derive(Parser, Debug)]
#[command(name = "arts")]
#[command(about = "Extract article metadata and content from a URL or file")]
struct Args {
    /// A URL (http/https) or a local file path (raw HTML or a WARC container).
    input: String,

    /// Debug sink letters to enable: h,c,a,d,u,s or "all".
    #[arg(short = 'd', long = "debug", default_value = "")]
    debug: String,

    /// Dump the parsed (post-preparation) HTML and exit, skipping extraction.
    #[arg(long = "parse")]
    parse_only: bool,

    /// Allow fetching from private/local networks.
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,
}

fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

async fn read_input(args: &Args, allow_private_networks: bool) -> Result<(Vec<u8>, Option<String>, String), String> {
    if looks_like_url(&args.input) {
        let client = reqwest::Client::builder()
            .user_agent("digests-arts/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| e.to_string())?;
        let opts = FetchOptions {
            allow_private_networks,
            ..Default::default()
        };
        let result = fetch(&client, &args.input, &opts)
            .await
            .map_err(|e| e.to_string())?;
        Ok((result.body.to_vec(), result.content_type.clone(), args.input.clone()))
    } else {
        let bytes = fs::read(&args.input).map_err(|e| format!("reading {}: {}", args.input, e))?;
        if let Some(warc) = first_response_record(&bytes) {
            Ok((warc.body, warc.content_type, args.input.clone()))
        } else {
            Ok((bytes, None, args.input.clone()))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let (raw, content_type, source_url) =
        match read_input(&args, args.allow_private_networks).await {
            Ok(v) => v,
            Err(e) => {
                eprintln!("arts: {}", e);
                return ExitCode::from(1);
            }
        };

    let html = digests_arts::resource::decode_resource(&raw, content_type.as_deref());

    if args.parse_only {
        println!("{}", html);
        return ExitCode::SUCCESS;
    }

    let stderr_sink: Rc<RefCell<dyn std::io::Write>> = Rc::new(RefCell::new(std::io::stderr()));
    let debug = DebugSinks::from_letters(&args.debug, stderr_sink);
    let config = ConfigBuilder::new()
        .debug(debug)
        .allow_private_networks(args.allow_private_networks)
        .build();

    let doc = Document::from(html.as_str());
    let article = extract(&doc, &source_url, &config);

    match formats::render_front_matter(&article) {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("arts: rendering output: {}", e);
            ExitCode::from(1)
        }
    }
}
