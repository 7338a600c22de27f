use std::fmt;

use crate::error::Result;
use crate::range::CellRange;

/// A three-level address: workbook, worksheet within it, range within that.
/// Any suffix of the levels may be empty; classification is derived from
/// which fields are set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DataSpec {
    pub workbook: String,
    pub worksheet: String,
    pub range: CellRange,
}

impl DataSpec {
    pub fn for_workbook(id: &str) -> Self {
        DataSpec {
            workbook: id.to_string(),
            ..Default::default()
        }
    }

    /// Parse a "worksheet" or "worksheet!range" argument fragment.
    pub fn parse_worksheet_fragment(s: &str) -> Result<Self> {
        let mut spec = DataSpec::default();
        match s.split_once('!') {
            Some((worksheet, range)) => {
                spec.worksheet = worksheet.to_string();
                spec.range = CellRange::parse(range)?;
            }
            None => spec.worksheet = s.to_string(),
        }
        Ok(spec)
    }

    /// The range reference string the Sheets values API expects,
    /// e.g. "Sheet1!A1:B2".
    pub fn wire_ref(&self) -> String {
        if !self.worksheet.is_empty() {
            if !self.range.is_empty() {
                format!("{}!{}", self.worksheet, self.range)
            } else {
                self.worksheet.clone()
            }
        } else if !self.range.is_empty() {
            self.range.to_string()
        } else {
            String::new()
        }
    }

    pub fn is_workbook(&self) -> bool {
        !self.workbook.is_empty() && self.worksheet.is_empty() && self.range.is_empty()
    }

    pub fn is_worksheet(&self) -> bool {
        !self.workbook.is_empty() && !self.worksheet.is_empty() && self.range.is_empty()
    }

    pub fn is_range(&self) -> bool {
        !self.workbook.is_empty() && !self.worksheet.is_empty() && !self.range.is_empty()
    }
}

impl fmt::Display for DataSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.workbook.is_empty() {
            parts.push(format!("Workbook: {}", self.workbook));
        }
        if !self.worksheet.is_empty() {
            parts.push(format!("Worksheet: {}", self.worksheet));
        }
        if !self.range.is_empty() {
            parts.push(format!("Range: {}", self.range));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpecError;

    fn range(s: &str) -> CellRange {
        CellRange::parse(s).unwrap()
    }

    #[test]
    fn wire_ref_bare_worksheet() {
        let spec = DataSpec {
            worksheet: "mysheet".to_string(),
            ..Default::default()
        };
        assert_eq!(spec.wire_ref(), "mysheet");
    }

    #[test]
    fn wire_ref_bare_range() {
        let spec = DataSpec {
            range: range("A1:B10"),
            ..Default::default()
        };
        assert_eq!(spec.wire_ref(), "A1:B10");
    }

    #[test]
    fn wire_ref_combined() {
        let spec = DataSpec {
            worksheet: "mysheet".to_string(),
            range: range("A1:B10"),
            ..Default::default()
        };
        assert_eq!(spec.wire_ref(), "mysheet!A1:B10");
    }

    #[test]
    fn wire_ref_empty() {
        assert_eq!(DataSpec::default().wire_ref(), "");
    }

    #[test]
    fn parse_worksheet_fragment_blank() {
        assert_eq!(
            DataSpec::parse_worksheet_fragment("").unwrap(),
            DataSpec::default()
        );
    }

    #[test]
    fn parse_worksheet_fragment_just_worksheet() {
        assert_eq!(
            DataSpec::parse_worksheet_fragment("mysheet").unwrap(),
            DataSpec {
                worksheet: "mysheet".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn parse_worksheet_fragment_with_range() {
        assert_eq!(
            DataSpec::parse_worksheet_fragment("mysheet!A1:B100").unwrap(),
            DataSpec {
                worksheet: "mysheet".to_string(),
                range: range("A1:B100"),
                ..Default::default()
            }
        );
    }

    #[test]
    fn parse_worksheet_fragment_bad_range() {
        assert_eq!(
            DataSpec::parse_worksheet_fragment("mysheet!doot"),
            Err(SpecError::InvalidRange("doot".to_string()))
        );
    }

    #[test]
    fn classification_is_mutually_exclusive() {
        let wb = DataSpec::for_workbook("wb");
        assert!(wb.is_workbook() && !wb.is_worksheet() && !wb.is_range());

        let ws = DataSpec {
            workbook: "wb".to_string(),
            worksheet: "ws".to_string(),
            ..Default::default()
        };
        assert!(!ws.is_workbook() && ws.is_worksheet() && !ws.is_range());

        let r = DataSpec {
            workbook: "wb".to_string(),
            worksheet: "ws".to_string(),
            range: range("A1:B2"),
        };
        assert!(!r.is_workbook() && !r.is_worksheet() && r.is_range());

        let empty = DataSpec::default();
        assert!(!empty.is_workbook() && !empty.is_worksheet() && !empty.is_range());
    }

    #[test]
    fn display_omits_empty_fields() {
        let spec = DataSpec {
            workbook: "wb".to_string(),
            worksheet: "ws".to_string(),
            range: range("A1:B2"),
        };
        assert_eq!(spec.to_string(), "Workbook: wb, Worksheet: ws, Range: A1:B2");

        let ws_only = DataSpec {
            worksheet: "ws".to_string(),
            ..Default::default()
        };
        assert_eq!(ws_only.to_string(), "Worksheet: ws");

        assert_eq!(DataSpec::default().to_string(), "");
    }
}
