//! Terminal client for the Zeroname API — a minimal rendition of the
//! email-capture → upload → results / limit-reached flow.
//!
//! Usage state lives in a local JSON key-value file next to the working
//! directory; the free-usage quota is held entirely on the client, matching
//! the service's client-trust model.

use std::collections::BTreeMap;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use zeroname_api::analysis::AnalysisResult;
use zeroname_api::client::{GateState, StateStore, UsageGate};

const STATE_FILE: &str = ".zeroname_state.json";
const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Key-value store backed by a small JSON file. Write failures are warned
/// about and otherwise ignored — losing the counter only resets the quota.
struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    fn open(path: PathBuf) -> Self {
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    fn persist(&self) {
        match serde_json::to_string_pretty(&self.values) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    eprintln!("warning: could not save usage state: {e}");
                }
            }
            Err(e) => eprintln!("warning: could not serialize usage state: {e}"),
        }
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

struct Args {
    cv_path: PathBuf,
    job_path: Option<PathBuf>,
    job_text: Option<String>,
    server: String,
}

fn parse_args() -> Result<Args> {
    let mut positional: Vec<String> = Vec::new();
    let mut job_text = None;
    let mut server = DEFAULT_SERVER.to_string();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--text" => {
                job_text = Some(args.next().context("--text requires a value")?);
            }
            "--server" => {
                server = args.next().context("--server requires a value")?;
            }
            _ => positional.push(arg),
        }
    }

    let Some(cv_path) = positional.first() else {
        bail!(
            "usage: client <cv-file> [job-file] [--text \"<job description>\"] [--server <url>]"
        );
    };
    let job_path = positional.get(1).map(PathBuf::from);
    if job_path.is_none() && job_text.is_none() {
        bail!("provide a job description: either a file or --text \"...\"");
    }

    Ok(Args {
        cv_path: PathBuf::from(cv_path),
        job_path,
        job_text,
        server,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let http = reqwest::Client::new();

    let mut gate = UsageGate::new(JsonFileStore::open(PathBuf::from(STATE_FILE)));

    if gate.state() == GateState::NoEmail {
        let email = prompt_email()?;
        // Best-effort: the gate transitions whether or not the sink call
        // succeeds.
        let sent = http
            .post(format!("{}/save-email", args.server))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await;
        if let Err(e) = sent {
            eprintln!("warning: could not register email with the server: {e}");
        }
        gate.capture_email(&email);
    }

    if !gate.can_analyze() {
        println!("You have used all your free analyses. Thanks for trying Zeroname!");
        return Ok(());
    }

    let cv_part = file_part(&args.cv_path)?;
    let mut form = reqwest::multipart::Form::new().part("cv", cv_part);
    form = match (&args.job_path, &args.job_text) {
        (Some(path), _) => form.part("jobDescription", file_part(path)?),
        (None, Some(text)) => form.text("jobDescriptionText", text.clone()),
        (None, None) => unreachable!("validated in parse_args"),
    };

    println!("Analyzing...");
    let response = http
        .post(format!("{}/analyze", args.server))
        .multipart(form)
        .send()
        .await
        .context("could not reach the analysis server")?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v["error"].as_str().map(String::from))
            .unwrap_or_else(|| "unknown server error".to_string());
        bail!("analysis failed ({status}): {message}");
    }

    let report: AnalysisResult = response
        .json()
        .await
        .context("the server returned an unreadable report")?;

    print_report(&report);

    gate.record_success();
    println!("\n{} free analysis(es) remaining.", gate.remaining());

    Ok(())
}

fn prompt_email() -> Result<String> {
    loop {
        print!("Enter your email to get started: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let email = line.trim().to_string();
        if email.contains('@') {
            return Ok(email);
        }
        println!("That does not look like an email address.");
    }
}

fn file_part(path: &Path) -> Result<reqwest::multipart::Part> {
    let bytes =
        std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(filename)
        .mime_str(guess_mime(path))?;
    Ok(part)
}

/// Declared MIME type for the upload; the server falls back to the filename
/// extension anyway, so octet-stream is an acceptable default.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" | "docx" => "application/msword",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn print_report(report: &AnalysisResult) {
    println!("\n=== Compatibility score: {}/100 ===", report.score);
    println!("{}\n", report.score_explanation);

    print_section("Strengths", &report.strengths);
    print_section("Weaknesses", &report.weaknesses);
    print_section("CV recommendations", &report.cv_recommendations);
    print_section("Interview tips", &report.behavior_tips);

    println!("--- Cover letter ---\n{}\n", report.cover_letter);
    println!("--- Conclusion ---\n{}", report.conclusion);
}

fn print_section(title: &str, items: &[String]) {
    println!("--- {title} ---");
    for item in items {
        println!("  - {item}");
    }
    println!();
}
