use clap::{Parser, Subcommand, ValueEnum};
use orderdashlib::{
    config::IngestConfig,
    error::{OrderDashError, Result},
    formats::{csv::Csv, json::Json},
    session::Session,
    traits::WriteFormat,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ExportFmt {
    Json,
    Csv,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Отчёт о загрузке и список клиентов
    Summary,
    /// Метрики и заказы одного клиента
    Customer {
        /// Код клиента (Terceiro Centralizador)
        code: String,
    },
    /// Помесячная сводка по клиенту или по всем клиентам
    Monthly {
        code: Option<String>,
    },
    /// Выгрузка собранной иерархии
    Export {
        #[arg(long = "to", value_enum)]
        to: ExportFmt,

        /// Выходной файл (по умолчанию stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "orderdash", version, about = "Дашборд по CSV-выгрузке заказов")]
struct Cli {
    /// Входной CSV (по умолчанию stdin)
    #[arg(short = 'i', long = "input", global = true)]
    input: Option<String>,

    /// Разделитель колонок
    #[arg(long, env = "ORDERDASH_DELIMITER", default_value = ",", global = true)]
    delimiter: String,

    /// Префикс валюты в колонке цены
    #[arg(long, env = "ORDERDASH_CURRENCY_PREFIX", default_value = "R$", global = true)]
    currency_prefix: String,

    /// Цена за единицу, если в названии товара нет множителя
    #[arg(long, env = "ORDERDASH_FALLBACK_UNIT_PRICE", default_value = "12", global = true)]
    fallback_unit_price: Decimal,

    /// Формат вывода для отчётов
    #[arg(long, value_enum, default_value_t = Output::Text, global = true)]
    format: Output,

    /// Логи в JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = IngestConfig::default()
        .with_delimiter(&cli.delimiter)?
        .with_currency_prefix(cli.currency_prefix.clone())
        .with_fallback_unit_price(cli.fallback_unit_price)?;

    // reader
    let reader: Box<dyn io::Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let mut session = Session::new(config);
    session.upload(BufReader::new(reader))?;

    let report = session.report().ok_or(OrderDashError::NoCustomers)?;
    let ds = session.dataset().ok_or(OrderDashError::NoCustomers)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Summary => render::summary(&mut out, cli.format, report, ds)?,
        Command::Customer { code } => {
            let customer = ds.customer(&code)?;
            render::customer(&mut out, cli.format, customer)?;
        }
        Command::Monthly { code } => {
            let customers = match code {
                Some(code) => vec![ds.customer(&code)?],
                None => ds.customers.values().collect(),
            };
            render::monthly(&mut out, cli.format, &customers)?;
        }
        Command::Export { to, output } => {
            // writer
            let mut writer: Box<dyn Write + '_> = match output {
                Some(path) => Box::new(File::create(path)?),
                None => Box::new(&mut out),
            };
            match to {
                ExportFmt::Json => Json::write(&mut writer, ds),
                ExportFmt::Csv => Csv::write(&mut writer, ds),
            }?;
            writer.flush()?;
        }
    }

    out.flush().map_err(OrderDashError::from)
}
