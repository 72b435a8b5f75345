use crate::error::{PreprocessError, Result};
use csv::StringRecord;

/// The only column the preprocessing stages read or write.
pub const TEXT_COLUMN: &str = "comment_text";

/// Column names of a comment table, with the position of `comment_text` resolved once.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    columns: StringRecord,
    text_index: usize,
}

impl Header {

    pub fn from_record(columns: &StringRecord) -> Result<Header> {
        let text_index = columns
            .iter()
            .position(|name| name == TEXT_COLUMN)
            .ok_or_else(|| PreprocessError::MissingColumn(TEXT_COLUMN.to_string()))?;

        Ok(Header { columns: columns.clone(), text_index })
    }

    pub fn columns(&self) -> &StringRecord {
        &self.columns
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }
}

/// One row of a comment table. `comment_text` is the named field every stage works on,
/// every other cell is kept in `passthrough` untouched and in its original order.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentRecord {
    pub comment_text: String,
    passthrough: Vec<String>,
    text_index: usize,
}

impl CommentRecord {

    pub fn from_record(record: &StringRecord, header: &Header) -> CommentRecord {
        let text_index = header.text_index();
        let mut passthrough = Vec::with_capacity(record.len().saturating_sub(1));
        let mut comment_text = String::new();

        for (i, field) in record.iter().enumerate() {
            if i == text_index {
                comment_text = field.to_string();
            } else {
                passthrough.push(field.to_string());
            }
        }

        CommentRecord { comment_text, passthrough, text_index }
    }

    pub fn to_record(&self) -> StringRecord {
        let mut record = StringRecord::with_capacity(0, self.passthrough.len() + 1);
        let mut others = self.passthrough.iter();

        for i in 0..=self.passthrough.len() {
            if i == self.text_index {
                record.push_field(&self.comment_text);
            } else if let Some(field) = others.next() {
                record.push_field(field);
            }
        }
        record
    }

    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// Same row with its text replaced, other columns carried along.
    pub fn with_text(&self, comment_text: String) -> CommentRecord {
        CommentRecord { comment_text, passthrough: self.passthrough.clone(), text_index: self.text_index }
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn passthrough_columns_keep_their_place() {

        let header = Header::from_record(&StringRecord::from(vec!["id", "comment_text", "toxic"])).unwrap();
        let row = StringRecord::from(vec!["0001", "hello there", "1"]);

        let record = CommentRecord::from_record(&row, &header);
        assert_eq!(record.comment_text, "hello there");
        assert_eq!(record.passthrough(), &["0001".to_string(), "1".to_string()]);

        let rewritten = record.with_text("hi".to_string());
        assert_eq!(rewritten.to_record(), StringRecord::from(vec!["0001", "hi", "1"]));
    }

    #[test]
    fn text_column_may_be_last() {

        let header = Header::from_record(&StringRecord::from(vec!["id", "comment_text"])).unwrap();
        let record = CommentRecord::from_record(&StringRecord::from(vec!["7", "x y"]), &header);
        assert_eq!(record.to_record(), StringRecord::from(vec!["7", "x y"]));
    }

    #[test]
    fn missing_text_column_is_rejected() {

        let header = Header::from_record(&StringRecord::from(vec!["id", "text"]));
        assert!(matches!(header, Err(PreprocessError::MissingColumn(_))));
    }
}
