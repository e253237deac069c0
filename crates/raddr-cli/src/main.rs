use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use raddr_core::Explain;
use raddr_ipv4::Ipv4Address;
use raddr_ipv6::Ipv6Address;
use raddr_mac::MacAddress;
use tracing::{debug, warn, Level};

/// Generate random MAC, IPv4 and IPv6 addresses and explain their structure
#[derive(Parser)]
#[command(name = "random-addr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address kind: mac, ipv4 or ipv6 (default: mac)
    #[arg(value_name = "KIND")]
    kind: Option<String>,

    /// Explain this address instead of a random one
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Apply a network prefix, e.g. 10.0.0.0/8 (ipv4, ipv6)
    #[arg(short, long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Reinterpret the address under this prefix length (ipv4, ipv6)
    #[arg(short = 'l', long, value_name = "BITS")]
    prefix_length: Option<usize>,

    /// Overwrite the OUI, e.g. 00:00:5e (mac)
    #[arg(long, value_name = "OUI")]
    oui: Option<String>,

    /// Clear the U/L bit, making the address universal (mac)
    #[arg(long)]
    universal: bool,

    /// Set the I/G bit, making the address a group address (mac)
    #[arg(long)]
    group: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Diagrams and table
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Mac,
    Ipv4,
    Ipv6,
}

impl Kind {
    /// Unknown or missing kinds fall back to mac
    fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("mac") => Kind::Mac,
            Some("ipv4") => Kind::Ipv4,
            Some("ipv6") => Kind::Ipv6,
            Some(other) => {
                warn!(kind = other, "unknown address kind, using mac");
                Kind::Mac
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let kind = Kind::from_arg(cli.kind.as_deref());
    debug!(?kind, "selected address kind");

    let addr = build(kind, &cli)?;
    print_result(addr.as_ref(), cli.address.is_none(), cli.output)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build(kind: Kind, cli: &Cli) -> Result<Box<dyn Explain>> {
    warn_ignored(kind, cli);
    let addr: Box<dyn Explain> = match kind {
        Kind::Mac => Box::new(build_mac(cli)?),
        Kind::Ipv4 => Box::new(build_ipv4(cli)?),
        Kind::Ipv6 => Box::new(build_ipv6(cli)?),
    };
    Ok(addr)
}

fn warn_ignored(kind: Kind, cli: &Cli) {
    if kind == Kind::Mac {
        if cli.prefix.is_some() || cli.prefix_length.is_some() {
            warn!("--prefix and --prefix-length only apply to ipv4 and ipv6");
        }
    } else if cli.oui.is_some() || cli.universal || cli.group {
        warn!("--oui, --universal and --group only apply to mac");
    }
}

fn build_mac(cli: &Cli) -> Result<MacAddress> {
    let mut mac = match cli.address.as_deref() {
        Some(text) => MacAddress::parse(text)?,
        None => MacAddress::random()?,
    };

    if let Some(oui) = cli.oui.as_deref() {
        mac.set_oui(MacAddress::parse_half(oui)?);
    }
    if cli.universal {
        mac.set_ul(true);
    }
    if cli.group {
        mac.set_ig(false);
    }
    Ok(mac)
}

fn build_ipv4(cli: &Cli) -> Result<Ipv4Address> {
    let mut ip = match cli.address.as_deref() {
        Some(text) => Ipv4Address::parse(text)?,
        None => Ipv4Address::random()?,
    };

    if let Some(prefix) = cli.prefix.as_deref() {
        ip.set_prefix(prefix)?;
    }
    if let Some(len) = cli.prefix_length {
        ip.set_prefix_length(len)?;
    }
    Ok(ip)
}

fn build_ipv6(cli: &Cli) -> Result<Ipv6Address> {
    let mut ip = match cli.address.as_deref() {
        Some(text) => Ipv6Address::parse(text)?,
        None => Ipv6Address::random()?,
    };

    if let Some(prefix) = cli.prefix.as_deref() {
        ip.set_prefix(prefix)?;
    }
    if let Some(len) = cli.prefix_length {
        ip.set_prefix_length(len)?;
    }
    Ok(ip)
}

fn print_result(addr: &dyn Explain, random: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print_human(addr, random),
        OutputFormat::Json => print_json(addr, true)?,
        OutputFormat::JsonCompact => print_json(addr, false)?,
    }
    Ok(())
}

fn title(addr: &dyn Explain, random: bool) -> String {
    if random {
        format!("Random {} Address", addr.family())
    } else {
        format!("{} Address", addr.family())
    }
}

fn print_heading(text: &str) {
    println!("{}", text.bold().cyan());
    println!("{}", "=".repeat(text.len()).dimmed());
    println!();
}

fn print_human(addr: &dyn Explain, random: bool) {
    print_heading(&title(addr, random));
    println!("{}", addr);
    println!();
    print_heading("Details");
    println!("{}", addr.explain());
    println!();
    println!("{}", addr.table());
    println!();
}

fn print_json(addr: &dyn Explain, pretty: bool) -> Result<()> {
    let summary = addr.summary();
    if pretty {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}
