//! CLI tool for the card input engine.
//!
//! # Usage
//!
//! ```bash
//! # Detect the network of a (partial) number
//! cardinput detect 3782
//!
//! # Format as the form would display it
//! cardinput format 378282246310005
//! cardinput format --expiry 1227
//!
//! # Validate a whole card
//! cardinput check --number 4242424242424242 --name "Ada Lovelace" --expiry 12/27 --cvc 123 -o json
//!
//! # Generate test card numbers
//! cardinput generate --network amex --count 3
//!
//! # Replay timed keystrokes through the debounced form
//! cardinput replay number=4242@0 number=4242424242424242@120 cvc=12@400 cvc=123@450
//! ```

use card_input::form::{CardData, CardForm, Field, FieldStatus, FormConfig, FormObserver};
use card_input::format::{format_expiry, format_with_separator};
use card_input::generate::{generate_card_with_rng, generate_cards};
use card_input::mask::{last_four, mask_number};
use card_input::network::{classify, CardNetwork};
use card_input::validate::validate_field;
use card_input::YearMonth;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cardinput")]
#[command(
    author,
    version,
    about = "Card network detection, formatting and validation"
)]
struct Cli {
    /// Log library events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the card network from a (partial) number
    Detect {
        /// Card number or prefix
        card_number: String,
    },

    /// Format a card number or an expiry date
    Format {
        /// Raw input
        value: String,

        /// Format as an MM/YY expiry instead of a card number
        #[arg(short, long)]
        expiry: bool,

        /// Separator between digit groups
        #[arg(short, long, default_value = " ")]
        separator: String,
    },

    /// Validate card fields
    Check {
        /// Card number
        #[arg(long)]
        number: Option<String>,

        /// Cardholder name
        #[arg(long)]
        name: Option<String>,

        /// Expiry date (MM/YY)
        #[arg(long)]
        expiry: Option<String>,

        /// Card verification code
        #[arg(long)]
        cvc: Option<String>,

        /// Month to check the expiry against (YYYY-MM), defaults to today
        #[arg(long, value_parser = parse_month)]
        today: Option<YearMonth>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Check if a number passes the Luhn algorithm
    Luhn {
        /// Card number to check
        card_number: String,
    },

    /// Generate test card numbers (for testing only)
    Generate {
        /// Card network to generate
        #[arg(short, long, default_value = "visa")]
        network: NetworkArg,

        /// Number of cards to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Output formatted (with spaces)
        #[arg(short, long)]
        formatted: bool,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Feed timed keystrokes (FIELD=VALUE@MS) through the debounced form
    Replay {
        /// Keystroke events, e.g. number=4242@0
        #[arg(required = true)]
        events: Vec<String>,

        /// Settle delay in milliseconds
        #[arg(long, default_value = "300")]
        settle_ms: u64,

        /// Keep focus where it is when a field completes
        #[arg(long)]
        no_auto_advance: bool,

        /// Month to check the expiry against (YYYY-MM), defaults to today
        #[arg(long, value_parser = parse_month)]
        today: Option<YearMonth>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum NetworkArg {
    Visa,
    Mastercard,
    Amex,
    Discover,
}

impl From<NetworkArg> for CardNetwork {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Visa => CardNetwork::Visa,
            NetworkArg::Mastercard => CardNetwork::Mastercard,
            NetworkArg::Amex => CardNetwork::Amex,
            NetworkArg::Discover => CardNetwork::Discover,
        }
    }
}

fn parse_month(s: &str) -> Result<YearMonth, String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got {:?}", s))?;
    let year: u16 = year.parse().map_err(|_| format!("invalid year {:?}", year))?;
    let month: u8 = month.parse().map_err(|_| format!("invalid month {:?}", month))?;
    YearMonth::new(year, month).ok_or_else(|| format!("month must be 01-12, got {}", month))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "card_input=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ok = match cli.command {
        Commands::Detect { card_number } => cmd_detect(&card_number),
        Commands::Format {
            value,
            expiry,
            separator,
        } => cmd_format(&value, expiry, &separator),
        Commands::Check {
            number,
            name,
            expiry,
            cvc,
            today,
            output,
        } => {
            let fields = [
                (Field::Number, number),
                (Field::Name, name),
                (Field::Expiry, expiry),
                (Field::Cvc, cvc),
            ];
            cmd_check(&fields, today.unwrap_or_else(YearMonth::now), output)
        }
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Generate {
            network,
            count,
            formatted,
            seed,
        } => cmd_generate(network.into(), count, formatted, seed),
        Commands::Replay {
            events,
            settle_ms,
            no_auto_advance,
            today,
            output,
        } => {
            let config = FormConfig::default()
                .with_settle_delay(Duration::from_millis(settle_ms))
                .with_auto_advance(!no_auto_advance);
            cmd_replay(&events, config, today, output)
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_detect(card_number: &str) -> bool {
    if !card_number.chars().any(|c| c.is_ascii_digit()) {
        eprintln!("Error: No digits provided");
        return false;
    }

    match classify(card_number) {
        Some(n) => {
            println!("Detected Network: {}", n.name);
            println!("Valid Lengths: {:?}", n.accepted_lengths);
            println!("Grouping: {:?}", n.group_format);
            println!("CVC Length: {}", n.cvc_length);
        }
        None => {
            println!("Detected Network: Unknown");
        }
    }
    true
}

fn cmd_format(value: &str, expiry: bool, separator: &str) -> bool {
    if expiry {
        println!("{}", format_expiry(value));
    } else {
        println!("{}", format_with_separator(value, classify(value), separator));
    }
    true
}

#[derive(Serialize)]
struct FieldReport {
    field: Field,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct CheckReport {
    valid: bool,
    network: Option<CardNetwork>,
    #[serde(skip_serializing_if = "Option::is_none")]
    masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last4: Option<String>,
    fields: Vec<FieldReport>,
}

fn cmd_check(fields: &[(Field, Option<String>)], today: YearMonth, output: OutputFormat) -> bool {
    let number = fields
        .iter()
        .find(|(f, _)| *f == Field::Number)
        .and_then(|(_, v)| v.as_deref());
    let network = number.and_then(classify);

    let reports: Vec<FieldReport> = fields
        .iter()
        .filter_map(|(field, value)| {
            let value = value.as_deref()?;
            let result = validate_field(*field, value, network, today);
            Some(FieldReport {
                field: *field,
                valid: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            })
        })
        .collect();

    if reports.is_empty() {
        eprintln!("Error: Nothing to check, pass at least one of --number, --name, --expiry, --cvc");
        return false;
    }

    let report = CheckReport {
        valid: reports.iter().all(|r| r.valid),
        network: network.map(|n| n.network),
        masked: number.map(mask_number),
        last4: number.map(last_four).filter(|l| !l.is_empty()),
        fields: reports,
    };

    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if report.valid { "yes" } else { "no" });
            if let Some(network) = report.network {
                println!("Network: {}", network);
            }
            if let Some(masked) = &report.masked {
                println!("Masked: {}", masked);
            }
            if let Some(last4) = &report.last4 {
                println!("Last 4: {}", last4);
            }
            for r in &report.fields {
                match &r.error {
                    None => println!("{:<8} ok", r.field),
                    Some(e) => println!("{:<8} {}", r.field, e),
                }
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return false;
            }
        },
    }

    report.valid
}

fn cmd_luhn(card_number: &str) -> bool {
    if card_input::luhn::validate_str(card_number) {
        println!("Luhn check: PASS");
        true
    } else {
        println!("Luhn check: FAIL");
        false
    }
}

fn cmd_generate(network: CardNetwork, count: usize, formatted: bool, seed: Option<u64>) -> bool {
    let numbers = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..count)
                .map(|_| generate_card_with_rng(network, &mut rng))
                .collect()
        }
        None => generate_cards(network, count),
    };
    for number in numbers {
        if formatted {
            println!("{}", format_with_separator(&number, Some(network.descriptor()), " "));
        } else {
            println!("{}", number);
        }
    }
    true
}

/// One parsed `FIELD=VALUE@MS` event.
struct Keystroke {
    field: Field,
    value: String,
    at: Duration,
}

fn parse_keystroke(event: &str) -> Result<Keystroke, String> {
    let (field, rest) = event
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE@MS, got {:?}", event))?;
    let field = Field::from_name(field).ok_or_else(|| format!("unknown field {:?}", field))?;
    let (value, at) = match rest.rsplit_once('@') {
        Some((value, ms)) => {
            let ms: u64 = ms
                .parse()
                .map_err(|_| format!("invalid timestamp {:?} in {:?}", ms, event))?;
            (value, Duration::from_millis(ms))
        }
        None => (rest, Duration::ZERO),
    };
    Ok(Keystroke {
        field,
        value: value.to_string(),
        at,
    })
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReplayEvent {
    Change {
        at_ms: u128,
        is_valid: bool,
        number: String,
        name: String,
        expiry: String,
        cvc_length: usize,
    },
    Focus {
        at_ms: u128,
        from: Field,
        to: Field,
    },
}

/// Prints form notifications as they happen.
struct ReplayPrinter {
    output: OutputFormat,
    now: Duration,
}

impl ReplayPrinter {
    fn emit(&self, event: ReplayEvent) {
        match self.output {
            OutputFormat::Text => match event {
                ReplayEvent::Change {
                    at_ms,
                    is_valid,
                    number,
                    name,
                    expiry,
                    cvc_length,
                } => println!(
                    "{:>6}ms change valid={} number={} name={:?} expiry={:?} cvc={}",
                    at_ms,
                    is_valid,
                    number,
                    name,
                    expiry,
                    "*".repeat(cvc_length)
                ),
                ReplayEvent::Focus { at_ms, from, to } => {
                    println!("{:>6}ms focus {} -> {}", at_ms, from, to)
                }
            },
            OutputFormat::Json => match serde_json::to_string(&event) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: {}", e),
            },
        }
    }
}

impl FormObserver for ReplayPrinter {
    fn on_change(&mut self, is_valid: bool, data: &CardData) {
        self.emit(ReplayEvent::Change {
            at_ms: self.now.as_millis(),
            is_valid,
            number: mask_number(&data.number),
            name: data.name.clone(),
            expiry: data.expiry.clone(),
            cvc_length: data.cvc.len(),
        });
    }

    fn on_focus_advance(&mut self, from: Field, to: Field) {
        self.emit(ReplayEvent::Focus {
            at_ms: self.now.as_millis(),
            from,
            to,
        });
    }
}

/// Settles every field due at or before `until`, in deadline order.
fn advance_to(form: &mut CardForm<ReplayPrinter>, until: Duration) {
    while let Some(deadline) = form.next_deadline().filter(|&d| d <= until) {
        form.observer_mut().now = deadline;
        form.tick(deadline);
    }
    form.observer_mut().now = until;
}

fn cmd_replay(
    events: &[String],
    config: FormConfig,
    today: Option<YearMonth>,
    output: OutputFormat,
) -> bool {
    let mut keystrokes = Vec::with_capacity(events.len());
    for event in events {
        match parse_keystroke(event) {
            Ok(k) => keystrokes.push(k),
            Err(e) => {
                eprintln!("Error: {}", e);
                return false;
            }
        }
    }
    keystrokes.sort_by_key(|k| k.at);

    let printer = ReplayPrinter {
        output,
        now: Duration::ZERO,
    };
    let mut form = CardForm::with_config(config, printer);
    if let Some(today) = today {
        form = form.with_reference_month(today);
    }

    for k in &keystrokes {
        advance_to(&mut form, k.at);
        debug!(field = %k.field, at_ms = k.at.as_millis() as u64, "replaying keystroke");
        form.input(k.field, &k.value, k.at);
    }
    advance_to(&mut form, Duration::MAX);

    let validity = form.validity();
    if let OutputFormat::Text = output {
        for field in Field::ALL {
            let status = validity.get(field);
            match form.field_error(field) {
                Some(e) => println!("{:<8} {:?}: {}", field, status, e),
                None if status == FieldStatus::Neutral => println!("{:<8} empty", field),
                None => println!("{:<8} {:?}", field, status),
            }
        }
    }
    validity.all_valid()
}

