/**
 * Parser for systemd-style calendar expressions.
 *
 * An expression is `[weekday] [date] [time]` with at least one part
 * present, or one of the shorthand forms (`daily`, `weekly`, ...). Each
 * date/time component accepts `*`, comma lists, `a..b` ranges and a
 * `/step` suffix on a value or range. An omitted time means midnight, an
 * omitted seconds component means zero.
 *
 * Reference: `https://www.freedesktop.org/software/systemd/man/systemd.time.html`
 */
use super::{error::CalendarError, event::Event, field::Field};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char, digit1},
    combinator::{all_consuming, map, map_res, opt},
    multi::separated_list1,
    sequence::{pair, preceded, tuple},
    Finish, IResult,
};
use std::str::FromStr;

/// One element of a component list, before it is applied to a field.
#[derive(Debug, Clone, Copy)]
enum Chunk {
    Wildcard { step: Option<u32> },
    Value { value: u32, step: Option<u32> },
    Range { low: u32, high: u32, step: Option<u32> },
}

pub(crate) fn parse_event(input: &str) -> Result<Event, CalendarError> {
    let expression = input.trim();
    if expression.is_empty() {
        return Err(CalendarError::Parse(String::from("empty expression")));
    }
    if let Some(event) = shorthand(expression)? {
        return Ok(event);
    }

    let mut event = Event::new();
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() > 3 {
        return Err(CalendarError::Parse(format!(
            "too many components in '{expression}'"
        )));
    }

    let mut index = 0;
    if starts_with_letter(parts[0]) {
        let items = run_parser(weekday_part, parts[0])?;
        for (low, high) in items {
            add_weekday_span(&mut event, low, high)?;
        }
        index += 1;
    }

    let mut time_seen = false;
    for part in &parts[index..] {
        if part.contains(':') {
            if time_seen {
                return Err(CalendarError::Parse(format!(
                    "unexpected second time component '{part}'"
                )));
            }
            time_seen = true;
            let (hours, minutes, seconds) = run_parser(time_part, part)?;
            apply_chunks(&mut event.hours, &hours)?;
            apply_chunks(&mut event.minutes, &minutes)?;
            match seconds {
                Some(chunks) => apply_chunks(&mut event.seconds, &chunks)?,
                None => event.seconds.add_value(0)?,
            }
        } else if part.contains('-') {
            if time_seen {
                return Err(CalendarError::Parse(format!(
                    "date component '{part}' after the time"
                )));
            }
            let components = run_parser(date_part, part)?;
            match components.as_slice() {
                [year, month, day] => {
                    apply_chunks(&mut event.year, year)?;
                    apply_chunks(&mut event.month, month)?;
                    apply_chunks(&mut event.day, day)?;
                }
                [month, day] => {
                    apply_chunks(&mut event.month, month)?;
                    apply_chunks(&mut event.day, day)?;
                }
                _ => {
                    return Err(CalendarError::Parse(format!(
                        "invalid date component '{part}'"
                    )))
                }
            }
        } else {
            return Err(CalendarError::Parse(format!(
                "unrecognized component '{part}'"
            )));
        }
    }

    if !time_seen {
        event.hours.add_value(0)?;
        event.minutes.add_value(0)?;
        event.seconds.add_value(0)?;
    }
    Ok(event)
}

impl FromStr for Event {
    type Err = CalendarError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_event(input)
    }
}

fn starts_with_letter(part: &str) -> bool {
    part.chars().next().is_some_and(|value| value.is_ascii_alphabetic())
}

fn midnight(event: &mut Event) -> Result<(), CalendarError> {
    event.hours.add_value(0)?;
    event.minutes.add_value(0)?;
    event.seconds.add_value(0)?;
    Ok(())
}

fn shorthand(expression: &str) -> Result<Option<Event>, CalendarError> {
    let mut event = Event::new();
    match expression.to_ascii_lowercase().as_str() {
        "minutely" => event.seconds.add_value(0)?,
        "hourly" => {
            event.minutes.add_value(0)?;
            event.seconds.add_value(0)?;
        }
        "daily" => midnight(&mut event)?,
        "weekly" => {
            event.week_day.add_value(1)?;
            midnight(&mut event)?;
        }
        "monthly" => {
            event.day.add_value(1)?;
            midnight(&mut event)?;
        }
        "quarterly" => {
            for month in [1, 4, 7, 10] {
                event.month.add_value(month)?;
            }
            event.day.add_value(1)?;
            midnight(&mut event)?;
        }
        "semiannually" => {
            event.month.add_value(1)?;
            event.month.add_value(7)?;
            event.day.add_value(1)?;
            midnight(&mut event)?;
        }
        "yearly" | "annually" => {
            event.month.add_value(1)?;
            event.day.add_value(1)?;
            midnight(&mut event)?;
        }
        _ => return Ok(None),
    }
    Ok(Some(event))
}

fn run_parser<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    input: &'a str,
) -> Result<O, CalendarError> {
    match all_consuming(parser)(input).finish() {
        Ok((_, output)) => Ok(output),
        Err(err) => Err(CalendarError::Parse(format!(
            "invalid component at '{}'",
            err.input
        ))),
    }
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

fn chunk(input: &str) -> IResult<&str, Chunk> {
    let (input, base) = alt((
        map(char('*'), |_| None),
        map(pair(number, opt(preceded(tag(".."), number))), Some),
    ))(input)?;
    let (input, step) = opt(preceded(char('/'), number))(input)?;
    let chunk = match base {
        None => Chunk::Wildcard { step },
        Some((low, Some(high))) => Chunk::Range { low, high, step },
        Some((value, None)) => Chunk::Value { value, step },
    };
    Ok((input, chunk))
}

fn component(input: &str) -> IResult<&str, Vec<Chunk>> {
    separated_list1(char(','), chunk)(input)
}

fn date_part(input: &str) -> IResult<&str, Vec<Vec<Chunk>>> {
    separated_list1(char('-'), component)(input)
}

#[allow(clippy::type_complexity)]
fn time_part(input: &str) -> IResult<&str, (Vec<Chunk>, Vec<Chunk>, Option<Vec<Chunk>>)> {
    tuple((
        component,
        preceded(char(':'), component),
        opt(preceded(char(':'), component)),
    ))(input)
}

fn weekday_name(input: &str) -> IResult<&str, u32> {
    map_res(alpha1, |name: &str| weekday_value(name).ok_or(()))(input)
}

fn weekday_item(input: &str) -> IResult<&str, (u32, Option<u32>)> {
    pair(weekday_name, opt(preceded(tag(".."), weekday_name)))(input)
}

fn weekday_part(input: &str) -> IResult<&str, Vec<(u32, Option<u32>)>> {
    separated_list1(char(','), weekday_item)(input)
}

/// Sunday is 0, matching the weekday field domain.
fn weekday_value(name: &str) -> Option<u32> {
    match name.to_ascii_lowercase().as_str() {
        "sun" | "sunday" => Some(0),
        "mon" | "monday" => Some(1),
        "tue" | "tuesday" => Some(2),
        "wed" | "wednesday" => Some(3),
        "thu" | "thursday" => Some(4),
        "fri" | "friday" => Some(5),
        "sat" | "saturday" => Some(6),
        _ => None,
    }
}

/// Weekday ranges may wrap around the end of the week (`Fri..Mon`).
fn add_weekday_span(
    event: &mut Event,
    low: u32,
    high: Option<u32>,
) -> Result<(), CalendarError> {
    match high {
        None => event.week_day.add_value(low),
        Some(high) if low <= high => event.week_day.add_range(low, high),
        Some(high) => {
            event.week_day.add_range(low, 6)?;
            event.week_day.add_range(0, high)
        }
    }
}

fn apply_chunks(field: &mut Field, chunks: &[Chunk]) -> Result<(), CalendarError> {
    for chunk in chunks {
        match *chunk {
            Chunk::Wildcard { step: None } => (),
            Chunk::Wildcard { step: Some(step) } => {
                add_stepped(field, field.min(), field.max(), step)?;
            }
            Chunk::Value { value, step: None } => field.add_value(value)?,
            Chunk::Value { value, step: Some(step) } => {
                add_stepped(field, value, field.max(), step)?;
            }
            Chunk::Range { low, high, step } => {
                add_stepped(field, low, high, step.unwrap_or(1))?;
            }
        }
    }
    Ok(())
}

fn add_stepped(field: &mut Field, low: u32, high: u32, step: u32) -> Result<(), CalendarError> {
    if step == 0 {
        return Err(CalendarError::Parse(String::from(
            "step value must be greater than zero",
        )));
    }
    if low > high {
        return Err(CalendarError::Parse(format!(
            "range {low}..{high} is inverted"
        )));
    }
    let mut value = low;
    while value <= high {
        field.add_value(value)?;
        value += step;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_event;
    use crate::calendar::event::EventClass;

    #[test]
    fn test_parse_time_only_part() {
        let event = parse_event("03:00").unwrap();
        assert_eq!(event.hours.values(), vec![3]);
        assert_eq!(event.minutes.values(), vec![0]);
        assert_eq!(event.seconds.values(), vec![0]);
        assert!(!event.day.has_value());
        assert_eq!(event.classify(), EventClass::Daily);
    }

    #[test]
    fn test_parse_time_with_seconds() {
        let event = parse_event("03:00:30").unwrap();
        assert_eq!(event.seconds.values(), vec![30]);
    }

    #[test]
    fn test_parse_hour_list() {
        let event = parse_event("01,02,03,04:00").unwrap();
        assert_eq!(event.hours.values(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_minute_step() {
        let event = parse_event("*:0/15").unwrap();
        assert_eq!(event.minutes.values(), vec![0, 15, 30, 45]);
        assert!(!event.hours.has_value());
        assert_eq!(event.seconds.values(), vec![0]);
    }

    #[test]
    fn test_parse_range_with_step() {
        let event = parse_event("8..18/2:00").unwrap();
        assert_eq!(event.hours.values(), vec![8, 10, 12, 14, 16, 18]);
    }

    #[test]
    fn test_parse_weekday_and_time() {
        let event = parse_event("Mon 09:00").unwrap();
        assert_eq!(event.week_day.values(), vec![1]);
        assert_eq!(event.hours.values(), vec![9]);
        assert_eq!(event.classify(), EventClass::Weekly);
    }

    #[test]
    fn test_parse_weekday_range() {
        let event = parse_event("Mon..Fri 06:30").unwrap();
        assert_eq!(event.week_day.values(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_weekday_range_wraps() {
        let event = parse_event("Fri..Mon 00:00").unwrap();
        assert_eq!(event.week_day.values(), vec![0, 1, 5, 6]);
    }

    #[test]
    fn test_parse_weekday_list_full_names() {
        let event = parse_event("Monday,Wednesday 12:00").unwrap();
        assert_eq!(event.week_day.values(), vec![1, 3]);
    }

    #[test]
    fn test_parse_full_date() {
        let event = parse_event("2024-06-01 12:30:00").unwrap();
        assert_eq!(event.year.values(), vec![2024]);
        assert_eq!(event.month.values(), vec![6]);
        assert_eq!(event.day.values(), vec![1]);
        assert_eq!(event.classify(), EventClass::TimeOnly);
    }

    #[test]
    fn test_parse_monthly_date() {
        let event = parse_event("*-*-15 02:00").unwrap();
        assert!(!event.year.has_value());
        assert!(!event.month.has_value());
        assert_eq!(event.day.values(), vec![15]);
        assert_eq!(event.classify(), EventClass::Monthly);
    }

    #[test]
    fn test_parse_month_day_without_year() {
        let event = parse_event("01,07-15 02:00").unwrap();
        assert_eq!(event.month.values(), vec![1, 7]);
        assert_eq!(event.day.values(), vec![15]);
    }

    #[test]
    fn test_parse_date_without_time_defaults_to_midnight() {
        let event = parse_event("*-*-01").unwrap();
        assert_eq!(event.hours.values(), vec![0]);
        assert_eq!(event.minutes.values(), vec![0]);
        assert_eq!(event.seconds.values(), vec![0]);
    }

    #[test]
    fn test_parse_weekday_only() {
        let event = parse_event("Sun").unwrap();
        assert_eq!(event.week_day.values(), vec![0]);
        assert_eq!(event.hours.values(), vec![0]);
    }

    #[test]
    fn test_parse_shorthands() {
        assert_eq!(parse_event("daily").unwrap().classify(), EventClass::Daily);
        assert_eq!(parse_event("weekly").unwrap().classify(), EventClass::Weekly);
        assert_eq!(
            parse_event("monthly").unwrap().classify(),
            EventClass::Monthly
        );
        let quarterly = parse_event("quarterly").unwrap();
        assert_eq!(quarterly.month.values(), vec![1, 4, 7, 10]);
        let minutely = parse_event("minutely").unwrap();
        assert_eq!(minutely.seconds.values(), vec![0]);
        assert!(!minutely.minutes.has_value());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_event("").is_err());
        assert!(parse_event("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event("not-a-schedule").is_err());
        assert!(parse_event("25:00").is_err());
        assert!(parse_event("12:60").is_err());
        assert!(parse_event("Funday 09:00").is_err());
        assert!(parse_event("09:00 *-*-01").is_err());
        assert!(parse_event("*:0/0").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_domain_date() {
        assert!(parse_event("*-13-01 00:00").is_err());
        assert!(parse_event("*-*-32 00:00").is_err());
    }
}
