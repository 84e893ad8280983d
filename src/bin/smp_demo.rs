use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use rand::RngCore;
use socialist_millionaire::{
    derive_secret, Event, EventReceiver, Peer, SecureRng, Session, SmpConfig, Version,
};
use tokio::time;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "smp-demo")]
#[command(
    about = "Runs a Socialist Millionaire exchange between two local peers",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Secret held by the initiator
    #[arg(short, long, env = "SMP_ALICE_SECRET")]
    alice: String,

    /// Secret held by the responder
    #[arg(short, long, env = "SMP_BOB_SECRET")]
    bob: String,

    /// Question attached to the first message
    #[arg(short, long)]
    question: Option<String>,

    /// Protocol version; overrides the configuration file
    #[arg(long, value_enum, ignore_case = true)]
    protocol: Option<Version>,

    /// Seconds to wait for the exchange to finish
    #[arg(long, default_value = "30")]
    timeout: u64,
}

fn print_colored(color: Color, text: &str) {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(color), Print(text), ResetColor).ok();
    stdout.flush().ok();
}

fn println_colored(color: Color, text: &str) {
    print_colored(color, text);
    println!();
}

fn display_banner() {
    println!();
    println_colored(
        Color::Cyan,
        "+---------------------------------------------------------+",
    );
    println_colored(
        Color::Cyan,
        "|          Socialist Millionaire Protocol Demo            |",
    );
    println_colored(
        Color::Cyan,
        "+---------------------------------------------------------+",
    );
    println!();
}

async fn outcome(name: &str, events: &mut EventReceiver) -> Option<Event> {
    while let Some(event) = events.recv().await {
        info!(peer = name, %event, "event");
        if event.is_terminal() {
            return Some(event);
        }
    }
    None
}

fn report(name: &str, event: Option<Event>) {
    print_colored(Color::White, &format!("  {name:<6}"));
    match event {
        Some(Event::Success) => println_colored(Color::Green, "secrets match"),
        Some(Event::Failure) => println_colored(Color::Yellow, "secrets differ"),
        Some(Event::Abort) => println_colored(Color::Yellow, "exchange aborted"),
        Some(event) => println_colored(Color::Red, &format!("exchange failed: {event}")),
        None => println_colored(Color::Red, "no outcome"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    display_banner();

    let mut config = SmpConfig::from_env().unwrap_or_else(|e| {
        error!("Failed to load configuration: {e}");
        info!("Using default configuration");
        SmpConfig::default()
    });
    if let Some(protocol) = args.protocol {
        config.version = protocol;
    }
    if args.question.is_some() {
        config.question = args.question.clone();
    }

    if let Err(e) = config.validate() {
        println_colored(Color::Red, &format!("Configuration validation failed: {e}"));
        return Err(format!("Invalid configuration: {e}").into());
    }

    let mut ssid = [0u8; 8];
    SecureRng::new().fill_bytes(&mut ssid);
    let alice_fp = b"alice-long-term-key-fingerprint";
    let bob_fp = b"bob-long-term-key-fingerprint";

    println!("  version  {:?}", config.version);
    println!("  ssid     {}", hex::encode(ssid));
    if let Some(question) = &config.question {
        println!("  question {question}");
    }
    println!();

    let mut alice_session = Session::new(config.version);
    alice_session.set_secret(derive_secret(alice_fp, bob_fp, &ssid, args.alice.as_bytes()))?;
    alice_session.set_question(config.question.clone());

    let mut bob_session = Session::new(config.version);
    bob_session.set_secret(derive_secret(alice_fp, bob_fp, &ssid, args.bob.as_bytes()))?;

    let mut alice = Peer::new(alice_session);
    let mut bob = Peer::new(bob_session);
    Peer::pipe(&mut alice, &mut bob);

    let mut bob_events = bob.events().ok_or("responder events already taken")?;
    let mut alice_events = alice
        .compare()
        .await?
        .ok_or("initiator events already taken")?;

    let limit = Duration::from_secs(args.timeout);
    let (alice_outcome, bob_outcome) = match time::timeout(limit, async {
        tokio::join!(
            outcome("alice", &mut alice_events),
            outcome("bob", &mut bob_events)
        )
    })
    .await
    {
        Ok(outcomes) => outcomes,
        Err(_) => {
            println_colored(Color::Red, "Exchange timed out");
            return Err("exchange timed out".into());
        }
    };

    report("alice", alice_outcome);
    report("bob", bob_outcome);
    println!();

    Ok(())
}
