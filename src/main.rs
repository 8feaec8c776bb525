use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Weekday;
use hijri_picker::{
    AllDates, CalendarDate, Chronology, DateFormatter, DateInputField, DateInputValidator,
    InputChange, InputIdentifier, NumberingStyle, PickerState, RangeCounterpart, SelectionMode,
    TextWidth, ValidationMessages, YearRange, calendar_math::weekday_order,
};
use icu::locale::Locale;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hijri-picker", version, about = "Hijri date picker engine")]
struct Cli {
    /// BCP-47 locale, e.g. en, en-GB, ar-SA, fa
    #[arg(long, default_value = "en")]
    locale: Locale,

    /// Use the locale's own digits
    #[arg(long)]
    native_digits: bool,

    /// First day of the week (mon, sat, sun, ...); defaults to the locale's
    #[arg(long)]
    first_day: Option<Weekday>,

    /// First year the picker offers
    #[arg(long, default_value_t = Chronology::MIN_YEAR)]
    from: i32,

    /// Last year the picker offers
    #[arg(long, default_value_t = Chronology::MAX_YEAR)]
    to: i32,

    /// Hijri calendar variant; defaults to the locale's -u-ca- keyword, then
    /// islamic-umalqura
    #[arg(long)]
    calendar: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the month grid containing DATE (yyyy-mm-dd), or today
    Month { date: Option<String> },
    /// Print DATE (yyyy-mm-dd) in every picker format
    Format { date: String },
    /// Parse and validate typed digits, e.g. 14460901
    Parse {
        text: String,
        /// Validate as a range start against this end date
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,
        /// Validate as a range end against this start date
        #[arg(long)]
        after: Option<String>,
    },
    /// Read typed digits line by line and show the field's reaction
    Input,
}

struct Context {
    locale: Locale,
    numbering: NumberingStyle,
    first_day: Weekday,
    chronology: Chronology,
    year_range: YearRange,
    formatter: Arc<DateFormatter>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Result<Self, String> {
        let chronology = match &cli.calendar {
            Some(id) => Chronology::from_id(id).ok_or_else(|| format!("unknown calendar '{id}'"))?,
            None => Chronology::from_locale(&cli.locale).unwrap_or_default(),
        };
        let year_range = YearRange::new(cli.from, cli.to).map_err(|e| e.to_string())?;
        let formatter = Arc::new(DateFormatter::default().with_chronology(chronology));
        let first_day = cli
            .first_day
            .unwrap_or_else(|| formatter.first_day_of_week(&cli.locale));
        Ok(Context {
            locale: cli.locale.clone(),
            numbering: if cli.native_digits {
                NumberingStyle::Native
            } else {
                NumberingStyle::Standard
            },
            first_day,
            chronology,
            year_range,
            formatter,
        })
    }

    fn parse_date(&self, text: &str) -> Result<CalendarDate, String> {
        let fields: Vec<&str> = text.split('-').collect();
        let [y, m, d] = fields.as_slice() else {
            return Err(format!("expected yyyy-mm-dd, got '{text}'"));
        };
        let number = |s: &str| s.parse::<i64>().map_err(|e| format!("'{text}': {e}"));
        let (y, m, d) = (number(y)?, number(m)?, number(d)?);
        let month = u8::try_from(m).map_err(|_| format!("'{text}': bad month"))?;
        let day = u8::try_from(d).map_err(|_| format!("'{text}': bad day"))?;
        let year = i32::try_from(y).map_err(|_| format!("'{text}': bad year"))?;
        CalendarDate::new_in(self.chronology, year, month, day).map_err(|e| e.to_string())
    }

    fn validator(&self) -> Arc<DateInputValidator> {
        Arc::new(DateInputValidator::new(
            self.year_range,
            Arc::new(AllDates),
            self.formatter.input_format().clone(),
            Arc::clone(&self.formatter),
            ValidationMessages::default(),
        ))
    }
}

fn print_month(ctx: &Context, date: Option<&str>) -> Result<(), String> {
    let today = CalendarDate::today_in(ctx.chronology).ok();
    let month = match date {
        Some(text) => ctx.parse_date(text)?,
        None => today.ok_or("today is outside the supported years")?,
    };
    let state = PickerState::new(ctx.year_range, Some(month), SelectionMode::Single, Arc::new(AllDates))
        .map_err(|e| e.to_string())?;

    let title = ctx
        .formatter
        .format_month_year(Some(&state.displayed_month()), &ctx.locale, ctx.numbering)
        .unwrap_or_default();
    println!("{title:^35}");

    let data = ctx.formatter.locale_data();
    let header: Vec<String> = weekday_order(ctx.first_day)
        .iter()
        .map(|w| format!("{:>5}", data.weekday_name(*w, TextWidth::Abbreviated, &ctx.locale)))
        .collect();
    println!("{}", header.concat());

    let grid = state.month_grid(ctx.first_day);
    for row in grid.rows() {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let n = ctx.formatter.format_number(i64::from(*day), &ctx.locale, ctx.numbering);
                    let marker = match today {
                        Some(t) if t.is_same_month(&month) && t.day() == *day => "*",
                        _ => " ",
                    };
                    format!("{n:>4}{marker}")
                }
                None => "     ".to_string(),
            })
            .collect();
        if !line.trim().is_empty() {
            println!("{}", line.trim_end());
        }
    }
    Ok(())
}

fn print_formats(ctx: &Context, text: &str) -> Result<(), String> {
    let date = ctx.parse_date(text)?;
    let f = &ctx.formatter;
    let show = |label: &str, value: Option<String>| println!("{label:<12}{}", value.unwrap_or_default());
    show("headline", f.format_headline(Some(&date), &ctx.locale, ctx.numbering));
    show("date", f.format_date(Some(&date), &ctx.locale, ctx.numbering, true));
    show("month", f.format_month_year(Some(&date), &ctx.locale, ctx.numbering));
    show("input", f.format_input_without_delimiters(Some(&date), &ctx.locale, ctx.numbering));
    show("weekday", Some(format!("{}", date.day_of_week())));
    show("iso", date.to_iso().map(|d| d.to_string()));
    Ok(())
}

fn run_parse(ctx: &Context, text: &str, before: Option<&str>, after: Option<&str>) -> Result<bool, String> {
    let validator = ctx.validator();
    let (input, counterpart) = match (before, after) {
        (Some(end), _) => (
            InputIdentifier::Start,
            RangeCounterpart {
                start: None,
                end: Some(ctx.parse_date(end)?),
            },
        ),
        (None, Some(start)) => (
            InputIdentifier::End,
            RangeCounterpart {
                start: Some(ctx.parse_date(start)?),
                end: None,
            },
        ),
        (None, None) => (InputIdentifier::Single, RangeCounterpart::default()),
    };
    let parsed = ctx
        .formatter
        .parse_without_delimiters(text, &ctx.locale, ctx.numbering);
    let error = validator.validate(&parsed, input, counterpart, &ctx.locale, ctx.numbering);
    match parsed {
        Ok(date) if error.is_empty() => {
            println!("{date}");
            Ok(true)
        }
        _ => {
            println!("{error}");
            Ok(false)
        }
    }
}

fn run_input(ctx: &Context) -> Result<(), String> {
    let mut field = DateInputField::new(ctx.validator(), InputIdentifier::Single);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Type digits for {}. Press Ctrl-D to exit.", ctx.formatter.input_skeleton());
    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let change = field.on_value_change(
                    line.trim(),
                    RangeCounterpart::default(),
                    &ctx.locale,
                    ctx.numbering,
                );
                let shown = field.display();
                match change {
                    InputChange::Rejected => println!("rejected, still [{}]", shown.text()),
                    InputChange::Accepted { error, date } => match date {
                        Some(date) => println!("[{}] -> {date}", shown.text()),
                        None if error.is_empty() => println!("[{}]", shown.text()),
                        None => println!("[{}] {error}", shown.text()),
                    },
                }
            }
            Err(e) => return Err(format!("Read error: {e}")),
        }
    }

    println!();
    Ok(())
}

fn init_tracing() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let ctx = match Context::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let result = match &cli.command {
        Command::Month { date } => print_month(&ctx, date.as_deref()).map(|()| true),
        Command::Format { date } => print_formats(&ctx, date).map(|()| true),
        Command::Parse { text, before, after } => {
            run_parse(&ctx, text, before.as_deref(), after.as_deref())
        }
        Command::Input => run_input(&ctx).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
