//! 벤더 코드와 정규화된 도메인 열거형 사이의 변환.
//!
//! 모든 함수는 상태가 없는 순수 함수입니다.
//! - 주문 상태: 벤더 9개 → 정규화 6개 (벤더 → 정규화 방향만, 손실 변환)
//! - 매매 방향: 양방향 전단사
//! - 개평 구분: 신규/청산 기본 코드 + 레거시 코드 48(신규)

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Asia::Shanghai;
use ksgold_core::{decimal_from_f64, Direction, Offset, Status};
use rust_decimal::Decimal;

use super::codes;
use crate::{KsgoldError, KsgoldResult};

/// 벤더 주문 상태 → 정규화 상태.
pub fn status_from_vendor(code: char) -> KsgoldResult<Status> {
    match code {
        codes::ENTRUST_SENDING => Ok(Status::Submitting),
        codes::ENTRUST_WAITING => Ok(Status::NotTraded),
        codes::ENTRUST_ERROR => Ok(Status::Rejected),
        codes::ENTRUST_IN => Ok(Status::NotTraded),
        codes::ENTRUST_PART_DONE => Ok(Status::PartTraded),
        codes::ENTRUST_ALL_DONE => Ok(Status::AllTraded),
        codes::ENTRUST_ALL_CANCEL => Ok(Status::Cancelled),
        codes::ENTRUST_PART_DONE_CANCEL => Ok(Status::Cancelled),
        codes::ENTRUST_WAIT_CANCEL => Ok(Status::Submitting),
        other => Err(KsgoldError::unmapped("status", other)),
    }
}

/// 벤더 매매 방향 → 정규화 방향.
pub fn direction_from_vendor(code: char) -> KsgoldResult<Direction> {
    match code {
        codes::BUY => Ok(Direction::Long),
        codes::SELL => Ok(Direction::Short),
        other => Err(KsgoldError::unmapped("direction", other)),
    }
}

/// 정규화 방향 → 벤더 매매 방향.
pub fn direction_to_vendor(direction: Direction) -> char {
    match direction {
        Direction::Long => codes::BUY,
        Direction::Short => codes::SELL,
    }
}

/// 벤더 개평 구분 → 정규화 개평 구분 (보고 경로, 엄격).
pub fn offset_from_vendor(code: i32) -> KsgoldResult<Offset> {
    match code {
        codes::OFFSET_OPEN | codes::OFFSET_OPEN_LEGACY => Ok(Offset::Open),
        codes::OFFSET_CLOSE => Ok(Offset::Close),
        other => Err(KsgoldError::unmapped("offset", other)),
    }
}

/// 벤더 개평 구분 → 정규화 개평 구분 (거부 경로, 관대).
///
/// 알 수 없는 코드는 `Offset::None`이 됩니다.
pub fn offset_from_vendor_lenient(code: i32) -> Offset {
    offset_from_vendor(code).unwrap_or(Offset::None)
}

/// 정규화 개평 구분 → 벤더 코드. 기본 코드만 사용합니다.
///
/// `Offset::None`은 벤더 코드가 없습니다.
pub fn offset_to_vendor(offset: Offset) -> Option<i32> {
    match offset {
        Offset::Open => Some(codes::OFFSET_OPEN),
        Offset::Close => Some(codes::OFFSET_CLOSE),
        Offset::None => None,
    }
}

/// 벤더가 "값 없음"으로 보내는 `f64::MAX`를 0으로 바꿉니다.
pub fn adjust_price(value: f64) -> f64 {
    if value == f64::MAX {
        0.0
    } else {
        value
    }
}

/// 센티널을 제거한 뒤 `Decimal`로 변환합니다.
pub fn sanitized(value: f64) -> Decimal {
    decimal_from_f64(adjust_price(value))
}

fn localize(naive: NaiveDateTime) -> KsgoldResult<DateTime<Utc>> {
    Shanghai
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| KsgoldError::TimestampError(format!("ambiguous local time: {}", naive)))
}

/// 시세 시각: `QuoteDate`(`%Y%m%d`) + `QuoteTime`(`%H:%M:%S`) + `UpdateMillisec`.
///
/// 상하이 현지 시각으로 해석해 UTC로 저장합니다.
pub fn quote_timestamp(date: &str, time: &str, millis: i32) -> KsgoldResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|e| KsgoldError::TimestampError(format!("QuoteDate '{}': {}", date, e)))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .map_err(|e| KsgoldError::TimestampError(format!("QuoteTime '{}': {}", time, e)))?;
    let millis = u32::try_from(millis)
        .ok()
        .filter(|ms| *ms < 1000)
        .ok_or_else(|| KsgoldError::TimestampError(format!("UpdateMillisec {}", millis)))?;

    let time = time
        .with_nanosecond(millis * 1_000_000)
        .ok_or_else(|| KsgoldError::TimestampError(format!("UpdateMillisec {}", millis)))?;
    localize(date.and_time(time))
}

/// 주문/체결 보고 시각: 거래소 기준 당일 날짜 + `%H:%M:%S`.
pub fn report_timestamp(today: NaiveDate, time: &str) -> KsgoldResult<DateTime<Utc>> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .map_err(|e| KsgoldError::TimestampError(format!("'{}': {}", time, e)))?;
    localize(today.and_time(parsed))
}

/// 거래소(상하이) 기준 오늘 날짜.
pub fn exchange_today() -> NaiveDate {
    Utc::now().with_timezone(&Shanghai).date_naive()
}
