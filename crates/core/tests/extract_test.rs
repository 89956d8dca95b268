//! End-to-end extraction over pdf2json statement dumps.

use ledgerscan_core::model::{ColumnType, ExtractTableResult};
use ledgerscan_core::output::{CsvStyle, OutputFormat, render};
use ledgerscan_core::source::{DecoderEvent, DocumentEvent, Pdf2JsonDocument, document_channel};
use ledgerscan_core::{ExtractError, ExtractSettings, extract_table, extract_table_for_job};

// Two pages. Page 1 carries a title, a header whose "Cheque" label wraps
// onto a second line, two transactions and an interest line without an
// amount. Page 2 has no header and one transaction.
const STATEMENT: &str = r#"{
  "Transcoder": "pdf2json@3.1.4",
  "Meta": { "PDFFormatVersion": "1.7", "Title": "Account Statement" },
  "Pages": [
    {
      "Width": 120, "Height": 60,
      "Texts": [
        { "x": 0, "y": 2, "w": 320, "R": [ { "T": "Statement%20of%20Account", "S": -1, "TS": [0, 14, 1, 0] } ] },

        { "x": 0, "y": 10, "w": 128, "R": [ { "T": "Txn%20Date", "S": -1, "TS": [0, 12, 1, 0] } ] },
        { "x": 40, "y": 10, "w": 480, "R": [ { "T": "Description", "S": -1, "TS": [0, 12, 1, 0] } ] },
        { "x": 72, "y": 10, "w": 96, "R": [ { "T": "Cheque", "S": -1, "TS": [0, 12, 1, 0] } ] },
        { "x": 80, "y": 10, "w": 128, "R": [ { "T": "Withdrawal", "S": -1, "TS": [0, 12, 1, 0] } ] },
        { "x": 90, "y": 10, "w": 128, "R": [ { "T": "Deposit", "S": -1, "TS": [0, 12, 1, 0] } ] },
        { "x": 100, "y": 10, "w": 128, "R": [ { "T": "Balance", "S": -1, "TS": [0, 12, 1, 0] } ] },
        { "x": 72.5, "y": 10.5, "w": 48, "R": [ { "T": "No.", "S": -1, "TS": [0, 12, 1, 0] } ] },

        { "x": 0.5, "y": 12, "w": 80, "R": [ { "T": "01%2F04%2F2024", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 10, "y": 12, "w": 320, "R": [ { "T": "NEFT%20salary%20ACME", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 45, "y": 12, "w": 128, "R": [ { "T": "N123", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 92, "y": 12, "w": 80, "R": [ { "T": "85%2C000.00", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 101, "y": 12, "w": 80, "R": [ { "T": "1%2C20%2C000.00", "S": -1, "TS": [0, 11, 0, 0] } ] },

        { "x": 0.5, "y": 13, "w": 80, "R": [ { "T": "03%2F04%2F2024", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 10, "y": 13, "w": 320, "R": [ { "T": "UPI%2FGrocery%20store%2F", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 85, "y": 13, "w": 64, "R": [ { "T": "1%2C250.50", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 101, "y": 13, "w": 80, "R": [ { "T": "1%2C18%2C749.50", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 10, "y": 13.6, "w": 160, "R": [ { "T": "Bengaluru", "S": -1, "TS": [0, 11, 0, 0] } ] },

        { "x": 0.5, "y": 15, "w": 80, "R": [ { "T": "05%2F04%2F2024", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 10, "y": 15, "w": 320, "R": [ { "T": "Opening%20interest", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 101, "y": 15, "w": 80, "R": [ { "T": "1%2C18%2C749.50", "S": -1, "TS": [0, 11, 0, 0] } ] }
      ]
    },
    {
      "Width": 120, "Height": 60,
      "Texts": [
        { "x": 0.5, "y": 3, "w": 80, "R": [ { "T": "07%2F04%2F2024", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 10, "y": 3, "w": 320, "R": [ { "T": "ATM%20withdrawal", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 85, "y": 3, "w": 64, "R": [ { "T": "2%2C000", "S": -1, "TS": [0, 11, 0, 0] } ] },
        { "x": 101, "y": 3, "w": 80, "R": [ { "T": "1%2C16%2C749.50", "S": -1, "TS": [0, 11, 0, 0] } ] }
      ]
    }
  ]
}"#;

fn document() -> Pdf2JsonDocument {
    Pdf2JsonDocument::from_slice(STATEMENT.as_bytes()).unwrap()
}

fn extract_statement() -> ExtractTableResult {
    extract_table(document().into_events(), &ExtractSettings::default()).unwrap()
}

#[test]
fn test_columns_follow_header_order() {
    let result = extract_statement();
    let types: Vec<ColumnType> = result.columns.iter().map(|c| c.column_type).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::TxDate,
            ColumnType::Description,
            ColumnType::Reference,
            ColumnType::Debit,
            ColumnType::Credit,
            ColumnType::Balance,
        ]
    );

    let labels: Vec<&str> = result.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Txn Date", "Description", "Cheque No.", "Withdrawal", "Deposit", "Balance"]
    );
    let indexes: Vec<usize> = result.columns.iter().map(|c| c.index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_column_spans_tile_the_header() {
    let result = extract_statement();
    let spans: Vec<(f64, f64)> = result.columns.iter().map(|c| (c.x, c.width)).collect();
    assert_eq!(
        spans,
        vec![
            (0.0, 7.0),
            (7.0, 36.0),
            (43.0, 41.0),
            (84.0, 7.0),
            (91.0, 9.0),
            (100.0, 8.0),
        ]
    );
    for pair in result.columns.windows(2) {
        assert_eq!(pair[0].right(), pair[1].x);
    }
}

#[test]
fn test_rows_across_pages() {
    let result = extract_statement();
    assert_eq!(result.rows.len(), 3);

    let salary = &result.rows[0];
    assert_eq!(salary.text(ColumnType::TxDate), Some("01/04/2024"));
    assert_eq!(salary.text(ColumnType::Description), Some("NEFT salary ACME"));
    assert_eq!(salary.text(ColumnType::Reference), Some("N123"));
    assert_eq!(salary.number(ColumnType::Credit), Some(85000.0));
    assert_eq!(salary.number(ColumnType::Balance), Some(120000.0));
    assert!(!salary.contains(ColumnType::Debit));

    let grocery = &result.rows[1];
    assert_eq!(
        grocery.text(ColumnType::Description),
        Some("UPI/Grocery store/ Bengaluru")
    );
    assert_eq!(grocery.number(ColumnType::Debit), Some(1250.5));
    assert!(!grocery.contains(ColumnType::Reference));

    // Page 2 reuses page 1's columns.
    let atm = &result.rows[2];
    assert_eq!(atm.text(ColumnType::TxDate), Some("07/04/2024"));
    assert_eq!(atm.number(ColumnType::Debit), Some(2000.0));
    assert_eq!(atm.number(ColumnType::Balance), Some(116749.5));
}

#[test]
fn test_channel_replay_matches_in_memory_events() {
    let in_memory = extract_statement();
    let streamed =
        extract_table_for_job("replay", document().spawn_decoder(1), &ExtractSettings::default())
            .unwrap();
    assert_eq!(streamed, in_memory);
}

#[test]
fn test_out_of_order_pages_are_reordered() {
    let mut pages = document().pages;
    let second = pages.pop().unwrap();
    let first = pages.pop().unwrap();

    let (sender, stream) = document_channel(4);
    assert!(sender.send(DecoderEvent::Page { index: 1, page: second }));
    assert!(sender.send(DecoderEvent::Page { index: 0, page: first }));
    assert!(sender.send(DecoderEvent::End));

    let result = extract_table(stream, &ExtractSettings::default()).unwrap();
    assert_eq!(result, extract_statement());
}

#[test]
fn test_truncated_stream_is_a_decoder_error() {
    let mut pages = document().pages;
    let (sender, stream) = document_channel(4);
    assert!(sender.send(DecoderEvent::Page {
        index: 0,
        page: pages.remove(0),
    }));
    drop(sender);

    let err = extract_table(stream, &ExtractSettings::default()).unwrap_err();
    assert!(matches!(err, ExtractError::Decoder(_)));
}

#[test]
fn test_no_header_anywhere_yields_empty_table() {
    let settings = ExtractSettings {
        header_min_matches: 7,
        ..ExtractSettings::default()
    };
    let result = extract_table(document().into_events(), &settings).unwrap();
    assert!(result.columns.is_empty());
    assert!(result.rows.is_empty());
}

#[test]
fn test_empty_document_is_rejected() {
    let doc = Pdf2JsonDocument::from_slice(br#"{ "Meta": {}, "Pages": [] }"#).unwrap();
    let err = extract_table(doc.into_events(), &ExtractSettings::default()).unwrap_err();
    assert!(matches!(err, ExtractError::NoPagesFound));
    assert_eq!(err.to_string(), "no pages found");
}

#[test]
fn test_metadata_only_stream_is_rejected() {
    let events = vec![
        DocumentEvent::Metadata(serde_json::json!({ "Title": "Empty" })),
        DocumentEvent::End,
    ];
    let err = extract_table(events, &ExtractSettings::default()).unwrap_err();
    assert!(matches!(err, ExtractError::NoPagesFound));
}

#[test]
fn test_csv_output() {
    let csv = render(&extract_statement(), OutputFormat::Csv, CsvStyle::Plain).unwrap();
    insta::assert_snapshot!(csv, @r"
    Txn Date,Description,Cheque No.,Withdrawal,Deposit,Balance
    01/04/2024,NEFT salary ACME,N123,,85000,120000
    03/04/2024,UPI/Grocery store/ Bengaluru,,1250.5,,118749.5
    07/04/2024,ATM withdrawal,,2000,,116749.5
    ");
}

#[test]
fn test_json_output() {
    let json = render(&extract_statement(), OutputFormat::Json, CsvStyle::Plain).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["columns"][2]["type"], "REFERENCE");
    assert_eq!(value["columns"][2]["label"], "Cheque No.");
    assert_eq!(value["columns"][2]["multiline"], true);
    assert_eq!(value["columns"][4]["parseNumber"], true);
    assert_eq!(
        value["rows"][0],
        serde_json::json!({
            "TX_DATE": "01/04/2024",
            "DESCRIPTION": "NEFT salary ACME",
            "REFERENCE": "N123",
            "CREDIT": 85000,
            "BALANCE": 120000
        })
    );
}
