//! Attendance export parser.
//!
//! Biometric terminals export a comma-separated text file: a header line, then
//! one line per check-in / check-out pair:
//!
//! ```text
//! employeeId,checkIn,checkOut,siteId,deviceId
//! emp-1,1718000000000,1718030000000,site-1,bio-7
//! ```
//!
//! Timestamps are epoch milliseconds. Lines missing the employee or either
//! timestamp, or whose timestamps are not integers, are dropped without comment.

use crate::models::NewAttendance;
use chrono::DateTime;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Parses an attendance export, skipping the header and malformed lines.
#[must_use]
pub fn parse_attendance(text: &str) -> Vec<NewAttendance> {
    text.split('\n').skip(1).filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<NewAttendance> {
    let mut fields = line.trim_end_matches('\r').split(',');
    let employee_id = fields.next().filter(|f| !f.is_empty())?;
    let check_in_ms = parse_millis(fields.next())?;
    let check_out_ms = parse_millis(fields.next())?;
    let site_id = fields.next().unwrap_or_default();
    let device_id = fields.next().unwrap_or_default();

    let check_in = DateTime::from_timestamp_millis(check_in_ms)?;
    let check_out = DateTime::from_timestamp_millis(check_out_ms)?;

    #[allow(clippy::cast_precision_loss)]
    let worked_hours = check_out_ms.checked_sub(check_in_ms)? as f64 / MILLIS_PER_HOUR;

    Some(NewAttendance {
        employee_id: employee_id.to_string(),
        check_in,
        check_out,
        worked_hours,
        site_id: site_id.to_string(),
        device_id: device_id.to_string(),
    })
}

fn parse_millis(field: Option<&str>) -> Option<i64> {
    field.filter(|f| !f.is_empty())?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    const HEADER: &str = "employeeId,checkIn,checkOut,siteId,deviceId";

    #[test]
    fn test_one_hour_example() {
        let records = parse_attendance(&format!("{HEADER}\nemp-1,0,3600000,site-1,bio-1"));
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.employee_id, "emp-1");
        assert_eq!(record.worked_hours, 1.0);
        assert_eq!(record.check_in.timestamp_millis(), 0);
        assert_eq!(record.check_out.timestamp_millis(), 3_600_000);
        assert_eq!(record.site_id, "site-1");
        assert_eq!(record.device_id, "bio-1");
    }

    #[test]
    fn test_header_only_or_empty() {
        assert!(parse_attendance("").is_empty());
        assert!(parse_attendance(HEADER).is_empty());
        // a header-like first line is discarded even if it parses
        assert!(parse_attendance("emp-1,0,3600000,s,d").is_empty());
    }

    #[test]
    fn test_drops_lines_missing_required_fields() {
        let text = format!(
            "{HEADER}\n\
             ,0,3600000,s,d\n\
             emp-2,,3600000,s,d\n\
             emp-3,0\n\
             emp-4\n\
             \n\
             emp-5,0,5400000,s,d\n"
        );
        let records = parse_attendance(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "emp-5");
        assert_eq!(records[0].worked_hours, 1.5);
    }

    #[test]
    fn test_drops_non_numeric_timestamps() {
        let text = format!("{HEADER}\nemp-1,morning,3600000,s,d\nemp-2,0,3600000,s,d");
        let records = parse_attendance(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "emp-2");
    }

    #[test]
    fn test_optional_trailing_fields_and_crlf() {
        let text = format!("{HEADER}\r\nemp-1,0,7200000\r\nemp-2,0,3600000,site-9,bio-2\r\n");
        let records = parse_attendance(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].site_id, "");
        assert_eq!(records[0].device_id, "");
        assert_eq!(records[0].worked_hours, 2.0);
        assert_eq!(records[1].device_id, "bio-2");
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let records = parse_attendance(&format!("{HEADER}\nemp-1,3600000,0,s,d"));
        assert_eq!(records[0].worked_hours, -1.0);
    }

    #[test]
    fn test_out_of_range_timestamps_are_dropped() {
        let text = format!(
            "{HEADER}\n\
             emp-1,-9000000000000000000,9000000000000000000,s,d\n\
             emp-2,{},0,s,d\n\
             emp-3,0,3600000,s,d",
            i64::MIN
        );
        let records = parse_attendance(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "emp-3");
    }
}
