// src/common/time.rs

use chrono::{DateTime, Datelike, Local, LocalResult, NaiveDate, TimeZone, Utc};

use crate::common::error::AppError;

/// Janela de tempo meio-aberta [start_ms, end_ms), em milissegundos de época.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Result<Self, AppError> {
        if start_ms > end_ms {
            return Err(AppError::InvalidTimeWindow);
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Da época (1970) até agora. Janela padrão dos relatórios sem filtro.
    pub fn since_epoch() -> Self {
        Self {
            start_ms: 0,
            end_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn contains(&self, instant_ms: i64) -> bool {
        instant_ms >= self.start_ms && instant_ms < self.end_ms
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        ms_to_utc(self.start_ms)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        ms_to_utc(self.end_ms)
    }
}

pub fn ms_to_utc(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Âncoras de calendário do dashboard: calendário gregoriano, fuso local,
/// alinhadas à meia-noite.
#[derive(Debug, Clone, Copy)]
pub struct DashboardAnchors {
    pub today_start_ms: i64,
    pub month_start_ms: i64,
    pub prev_month_start_ms: i64,
    /// Fim do mês anterior = início do mês atual - 1ms.
    pub prev_month_end_ms: i64,
}

pub fn dashboard_anchors(now: DateTime<Local>) -> DashboardAnchors {
    let today = now.date_naive();
    let month_start = first_day_of_month(today);
    let (prev_year, prev_month) = previous_month(today.year(), today.month());
    let prev_month_start = NaiveDate::from_ymd_opt(prev_year, prev_month, 1)
        .expect("o mês anterior sempre é uma data válida");

    let month_start_ms = local_midnight_ms(month_start);

    DashboardAnchors {
        today_start_ms: local_midnight_ms(today),
        month_start_ms,
        prev_month_start_ms: local_midnight_ms(prev_month_start),
        prev_month_end_ms: month_start_ms - 1,
    }
}

pub(crate) fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("o dia 1 sempre é uma data válida")
}

pub(crate) fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Meia-noite local em ms de época. Em transições de horário de verão a
/// meia-noite pode ser ambígua ou nem existir; ficamos com a primeira
/// ocorrência válida.
pub fn local_midnight_ms(date: NaiveDate) -> i64 {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .expect("00:00:00 sempre é uma hora válida");

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
        LocalResult::None => naive.and_utc().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_day_of_month_keeps_year_and_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            first_day_of_month(date),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn previous_month_rolls_over_the_year() {
        assert_eq!(previous_month(2024, 1), (2023, 12));
        assert_eq!(previous_month(2024, 7), (2024, 6));
    }

    #[test]
    fn dashboard_anchors_are_midnight_aligned() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 15, 12, 30, 0)
            .earliest()
            .unwrap();
        let anchors = dashboard_anchors(now);

        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let month_start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let prev_month_start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert_eq!(anchors.today_start_ms, local_midnight_ms(today));
        assert_eq!(anchors.month_start_ms, local_midnight_ms(month_start));
        assert_eq!(anchors.prev_month_start_ms, local_midnight_ms(prev_month_start));
        assert_eq!(anchors.prev_month_end_ms, anchors.month_start_ms - 1);
    }

    #[test]
    fn dashboard_anchors_in_january_point_to_december() {
        let now = Local
            .with_ymd_and_hms(2024, 1, 10, 8, 0, 0)
            .earliest()
            .unwrap();
        let anchors = dashboard_anchors(now);

        let prev_month_start = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(anchors.prev_month_start_ms, local_midnight_ms(prev_month_start));
    }

    #[test]
    fn window_rejects_inverted_bounds() {
        assert!(TimeWindow::new(10, 5).is_err());
        assert!(TimeWindow::new(5, 5).is_ok());
    }

    #[test]
    fn window_is_half_open() {
        let window = TimeWindow::new(0, 100).unwrap();
        assert!(window.contains(0));
        assert!(window.contains(99));
        assert!(!window.contains(100));
        assert!(!window.contains(-1));
    }
}
