use anyhow::{anyhow, Result};
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;
use std::time::Duration;

pub use serde_with::{serde_as, DeserializeAs, SerializeAs};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// 小数部分最多保留的位数，更多的位按截断处理
const MAX_FRACTION_DIGITS: usize = 19;

/// 以时间字符串读写 `Duration` 的 serde 适配器
///
/// 读取时接受 "1h30m"、"1.5s" 这类字符串，也接受整数（按秒）；写出时总是字符串。
pub struct HumanDur;

struct HumanDurVisitor;

impl<'de> Visitor<'de> for HumanDurVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("时间字符串（如 \"3s\"、\"1h30m\"）或秒数")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        parse_duration(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        u64::try_from(v)
            .map(Duration::from_secs)
            .map_err(|_| E::custom(format!("时长不能为负数: {}", v)))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumanDur {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        deserializer.deserialize_any(HumanDurVisitor)
    }
}

impl SerializeAs<Duration> for HumanDur {
    fn serialize_as<S: Serializer>(source: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_duration(*source))
    }
}

fn nanos_per_unit(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        "d" => 86_400 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}

fn split_digits(s: &str) -> (&str, &str) {
    s.split_at(s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len()))
}

/// 解析一段 `数字[.小数]单位`，返回该段的纳秒数和剩余部分
fn parse_segment<'a>(input: &str, rest: &'a str) -> Result<(u128, &'a str)> {
    let (whole, tail) = split_digits(rest);
    let (fraction, tail) = match tail.strip_prefix('.') {
        Some(after_dot) => split_digits(after_dot),
        None => ("", tail),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(anyhow!("期望数字: {}", rest));
    }

    let unit_len = tail
        .find(|c: char| c.is_ascii_digit() || c == '.')
        .unwrap_or(tail.len());
    let (unit, next) = tail.split_at(unit_len);
    if unit.is_empty() {
        return Err(anyhow!("缺少时间单位: {}", input));
    }
    let per_unit = nanos_per_unit(unit).ok_or_else(|| anyhow!("不支持的时间单位: {}", unit))?;

    let overflow = || anyhow!("时间溢出: {}", input);
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| overflow())?.into()
    };
    let mut nanos = whole.checked_mul(per_unit).ok_or_else(overflow)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let numerator: u128 = fraction.parse().map_err(|_| overflow())?;
        nanos += numerator * per_unit / 10u128.pow(fraction.len() as u32);
    }

    Ok((nanos, next))
}

/// 解析时间字符串: "1h30m45s" -> Duration
///
/// 由若干 `数字+单位` 段组成，单位区分大小写：
/// `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`, `d`。
/// 可带前导 `+`；单独的 "0" 表示零；不接受负数和空白。
/// 整数和小数部分分别按整数运算，结果精确到纳秒，上限为 `u64::MAX` 纳秒。
pub fn parse_duration(s: &str) -> Result<Duration> {
    if s.starts_with('-') {
        return Err(anyhow!("时长不能为负数: {}", s));
    }
    let body = s.strip_prefix('+').unwrap_or(s);
    if body.is_empty() {
        return Err(anyhow!("空字符串: {:?}", s));
    }
    if body == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u128 = 0;
    let mut rest = body;
    while !rest.is_empty() {
        let (nanos, next) = parse_segment(s, rest)?;
        total = total
            .checked_add(nanos)
            .filter(|t| *t <= u128::from(u64::MAX))
            .ok_or_else(|| anyhow!("时间溢出: {}", s))?;
        rest = next;
    }

    let nanos = u64::try_from(total).map_err(|_| anyhow!("时间溢出: {}", s))?;
    Ok(Duration::from_nanos(nanos))
}

/// 不足一秒的时长取能整除的最大单位
fn format_subsecond(nanos: u32) -> String {
    match nanos {
        n if n % 1_000_000 == 0 => format!("{}ms", n / 1_000_000),
        n if n % 1_000 == 0 => format!("{}us", n / 1_000),
        n => format!("{}ns", n),
    }
}

/// Duration 格式化为字符串: Duration -> "1h30m45s"
///
/// 输出总能被 [`parse_duration`] 还原；秒以下部分写成小数秒，如 "1m0.5s"。
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }
    let secs = duration.as_secs();
    let nanos = duration.subsec_nanos();
    if secs == 0 {
        return format_subsecond(nanos);
    }

    let parts = [
        (secs / 86_400, "d"),
        (secs % 86_400 / 3_600, "h"),
        (secs % 3_600 / 60, "m"),
    ];
    let mut out: String = parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    let seconds = secs % 60;
    if seconds > 0 || nanos > 0 {
        out.push_str(&seconds.to_string());
        if nanos > 0 {
            let digits = format!("{:09}", nanos);
            out.push('.');
            out.push_str(digits.trim_end_matches('0'));
        }
        out.push('s');
    }
    out
}
