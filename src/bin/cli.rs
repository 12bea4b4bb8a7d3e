//! voltwire CLI
//!
//! Log in to a server, or inspect parameter encodings and login digests.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use voltwire::protocol::{encode, DigestAlgorithm};
use voltwire::{ClientConfig, Connection, Timestamp, TypeTag, Value, WireError};

/// voltwire CLI
#[derive(Parser, Debug)]
#[command(name = "voltwire-cli")]
#[command(about = "Wire-level tools for a VoltDB-style database client")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and print the session metadata
    Login {
        /// Server address
        #[arg(short, long, default_value = voltwire::config::DEFAULT_ADDR)]
        server: String,

        #[arg(short, long, default_value = "")]
        user: String,

        #[arg(short, long, default_value = "")]
        password: String,

        /// Protocol version (0 = legacy SHA-1 digest)
        #[arg(long, default_value = "1")]
        protocol_version: u8,

        /// Connect/read/write timeout in milliseconds
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,
    },

    /// Print the wire bytes of one parameter
    Encode {
        /// Parameter type
        #[arg(value_enum)]
        kind: ParamKind,

        /// Value (hex for varbinary, microseconds for timestamp)
        value: Option<String>,

        /// Encode a null of the given type
        #[arg(long)]
        null: bool,

        /// Treat the value as a comma-separated array
        #[arg(long)]
        array: bool,
    },

    /// Print the login digest of a password
    Digest {
        password: String,

        #[arg(long, default_value = "1")]
        protocol_version: u8,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ParamKind {
    Bool,
    Tinyint,
    Smallint,
    Int,
    Bigint,
    Float,
    String,
    Varbinary,
    Timestamp,
}

impl ParamKind {
    fn tag(self) -> TypeTag {
        match self {
            ParamKind::Bool | ParamKind::Tinyint => TypeTag::Bool,
            ParamKind::Smallint => TypeTag::Short,
            ParamKind::Int => TypeTag::Int,
            ParamKind::Bigint => TypeTag::Long,
            ParamKind::Float => TypeTag::Float,
            ParamKind::String => TypeTag::String,
            ParamKind::Varbinary => TypeTag::Varbinary,
            ParamKind::Timestamp => TypeTag::Timestamp,
        }
    }

    fn parse(self, raw: &str) -> Result<Value, String> {
        let bad = |e: String| format!("invalid {:?} value {:?}: {}", self, raw, e);
        let value = match self {
            ParamKind::Bool => Value::Bool(raw.parse::<bool>().map_err(|e| bad(e.to_string()))?),
            ParamKind::Tinyint => Value::TinyInt(raw.parse::<i8>().map_err(|e| bad(e.to_string()))?),
            ParamKind::Smallint => Value::SmallInt(raw.parse::<i16>().map_err(|e| bad(e.to_string()))?),
            ParamKind::Int => Value::Int(raw.parse::<i32>().map_err(|e| bad(e.to_string()))?),
            ParamKind::Bigint => Value::BigInt(raw.parse::<i64>().map_err(|e| bad(e.to_string()))?),
            ParamKind::Float => Value::Float(raw.parse::<f64>().map_err(|e| bad(e.to_string()))?),
            ParamKind::String => Value::String(raw.to_string()),
            ParamKind::Varbinary => Value::Varbinary(parse_hex(raw).map_err(|e| bad(e.to_string()))?),
            ParamKind::Timestamp => {
                Value::Timestamp(Timestamp::from_micros(raw.parse::<i64>().map_err(|e| bad(e.to_string()))?))
            }
        };
        Ok(value)
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,voltwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Login {
            server,
            user,
            password,
            protocol_version,
            timeout_ms,
        } => {
            let config = ClientConfig::builder()
                .addr(server)
                .username(user)
                .password(password)
                .protocol_version(protocol_version)
                .connect_timeout_ms(timeout_ms)
                .read_timeout_ms(timeout_ms)
                .write_timeout_ms(timeout_ms)
                .build()
                .map_err(|e| e.to_string())?;

            let connection = Connection::connect(&config).map_err(|e| match e {
                WireError::AuthenticationFailed { .. } => format!("{} (check user/password)", e),
                other => other.to_string(),
            })?;

            let data = connection.data();
            println!("host id:       {}", data.host_id);
            println!("connection id: {}", data.connection_id);
            println!("leader:        {}", data.leader_ipv4());
            println!("build:         {}", data.build_string);
        }

        Commands::Encode {
            kind,
            value,
            null,
            array,
        } => {
            let value = match (null, value) {
                (true, _) => Value::TypedNull(kind.tag()),
                (false, Some(raw)) if array => Value::Array(
                    raw.split(',')
                        .map(|item| kind.parse(item.trim()))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                (false, Some(raw)) => kind.parse(&raw)?,
                (false, None) => return Err("a value or --null is required".to_string()),
            };

            let bytes = encode(&value).map_err(|e| e.to_string())?;
            println!("{}", to_hex(&bytes));
        }

        Commands::Digest {
            password,
            protocol_version,
        } => {
            let algorithm = DigestAlgorithm::for_protocol_version(protocol_version);
            println!("{:?} {}", algorithm, to_hex(&algorithm.digest(&password)));
        }
    }
    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

fn parse_hex(raw: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err("odd number of hex digits".to_string());
    }

    digits
        .chunks(2)
        .map(|pair| {
            let s: String = pair.iter().collect();
            u8::from_str_radix(&s, 16).map_err(|e| e.to_string())
        })
        .collect()
}
