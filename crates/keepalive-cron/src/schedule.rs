use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::error::CronError;

/// Once a day at 15:35 local time.
pub const DEFAULT_CRONTAB: &str = "35 15 * * *";

/// A parsed cron expression.
///
/// Accepts the classic crontab layout (`min hour dom month dow`, Sunday is
/// `0` or `7`) and the extended layout understood by the `cron` crate, which
/// adds a leading seconds column and an optional trailing year column.
///
/// In the classic layout a day matches when day-of-month *or* day-of-week
/// matches, provided neither field starts with `*`. The extended layout keeps
/// the `cron` crate's rule, where both must match.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expr: String,
    inner: Vec<cron::Schedule>,
}

impl CronSchedule {
    pub fn parse(expr: &str) -> Result<Self, CronError> {
        let expr = expr.trim();
        let inner = normalize(expr)?
            .iter()
            .map(|normalized| {
                cron::Schedule::from_str(normalized).map_err(|e| {
                    CronError::InvalidCronExpression {
                        expr: expr.to_string(),
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            expr: expr.to_string(),
            inner,
        })
    }

    /// The expression as written by the user.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// First fire time strictly after `from`.
    pub fn next_after(&self, from: &DateTime<Local>) -> Option<DateTime<Local>> {
        self.inner
            .iter()
            .filter_map(|schedule| schedule.after(from).next())
            .min()
    }
}

impl FromStr for CronSchedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Rewrite a 5-field crontab into the 6-field form of the `cron` crate.
///
/// A crontab restricting both day-of-month and day-of-week becomes two
/// expressions, one per day field, whose fire times are merged.
fn normalize(expr: &str) -> Result<Vec<String>, CronError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    match fields.len() {
        5 => {
            let (min, hour, dom, month) = (fields[0], fields[1], fields[2], fields[3]);
            let dow = crontab_dow(fields[4]).map_err(|reason| CronError::InvalidCronExpression {
                expr: expr.to_string(),
                reason,
            })?;

            if dom.starts_with('*') || dow.starts_with('*') {
                return Ok(vec![format!("0 {min} {hour} {dom} {month} {dow}")]);
            }
            Ok(vec![
                format!("0 {min} {hour} {dom} {month} *"),
                format!("0 {min} {hour} * {month} {dow}"),
            ])
        }
        6 | 7 => Ok(vec![fields.join(" ")]),
        n => Err(CronError::InvalidCronExpression {
            expr: expr.to_string(),
            reason: format!("expected 5, 6 or 7 fields, got {n}"),
        }),
    }
}

/// Crontab numbers weekdays 0-7 (both ends Sunday); the `cron` crate uses 1-7
/// starting at Sunday. Names and `*` pass through untouched.
fn crontab_dow(field: &str) -> Result<String, String> {
    let mut items = Vec::new();
    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };

        let mapped = match base.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (shift_day(start)?, end);
                if end == "7" {
                    // `a-7` runs through Sunday, which wraps to the front.
                    if step.is_some() {
                        return Err(format!("unsupported day-of-week range: {item}"));
                    }
                    items.push(format!("{start}-7"));
                    items.push("1".to_string());
                    continue;
                }
                format!("{start}-{}", shift_day(end)?)
            }
            None => shift_day(base)?,
        };

        match step {
            Some(step) => items.push(format!("{mapped}/{step}")),
            None => items.push(mapped),
        }
    }
    Ok(items.join(","))
}

fn shift_day(day: &str) -> Result<String, String> {
    if !day.chars().all(|c| c.is_ascii_digit()) || day.is_empty() {
        return Ok(day.to_string());
    }
    match day.parse::<u8>() {
        Ok(n @ 0..=6) => Ok((n + 1).to_string()),
        Ok(7) => Ok("1".to_string()),
        _ => Err(format!("day of week out of range: {day}")),
    }
}
