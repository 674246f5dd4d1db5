
    use super::*;
    use crate::event::LedgerTag;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_ledger_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = FileLedger::new(temp_dir.path().join("scraped_munis.log"));

        assert!(ledger.records().await.unwrap().is_empty());
        assert!(resolved_indices(&ledger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_ledger_append_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("scraped_munis.log");
        let ledger = FileLedger::new(&path);

        ledger.append(&LedgerEvent::started(2501, 0)).await.unwrap();
        ledger
            .append(&LedgerEvent::failed(2501, 0, "[RowLocated] Timed out"))
            .await
            .unwrap();
        ledger.append(&LedgerEvent::started(2501, 1)).await.unwrap();
        ledger
            .append(&LedgerEvent::terminal(2501, LedgerTag::Success))
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "2501,started,attempt_0\n\
             2501,failed,attempt_0,[RowLocated] Timed out\n\
             2501,started,attempt_1\n\
             2501,success\n"
        );

        let records = ledger.records().await.unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].tag(), Some(LedgerTag::Success));
    }

    #[tokio::test]
    async fn test_file_ledger_appends_to_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scraped_munis.log");
        std::fs::write(&path, "5,started,attempt_0\ncontinuation text\n").unwrap();

        let ledger = FileLedger::new(&path);
        ledger
            .append(&LedgerEvent::terminal(5, LedgerTag::Success))
            .await
            .unwrap();

        let records = ledger.records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body, "started,attempt_0 continuation text");
        assert_eq!(records[1].body, "success");
    }

    #[tokio::test]
    async fn test_file_ledger_tolerates_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scraped_munis.log");
        std::fs::write(&path, b"3,failed,attempt_0,bad \xff byte\n3,no_opendata\n").unwrap();

        let ledger = FileLedger::new(&path);
        let resolved = resolved_indices(&ledger).await.unwrap();
        assert!(resolved.contains(&3));
    }

    #[tokio::test]
    async fn test_resolved_indices_only_terminal() {
        let ledger = MemoryLedger::with_lines([
            "1,started,attempt_0",
            "1,failed,attempt_0,boom",
            "1,started,attempt_1",
            "1,failed,attempt_1,boom",
            "1,exhausted,attempts_2",
            "2,started,attempt_0",
            "2,bayern_skip",
            "3,started,attempt_0",
            "3,no_bundestagswahl",
            "4,started,attempt_0",
            "4,success",
        ]);

        let resolved = resolved_indices(&ledger).await.unwrap();
        assert!(!resolved.contains(&1));
        assert!(resolved.contains(&2));
        assert!(resolved.contains(&3));
        assert!(resolved.contains(&4));
        assert_eq!(resolved.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_ledger_records_lines() {
        let ledger = MemoryLedger::new();
        ledger.append(&LedgerEvent::started(9, 0)).await.unwrap();
        ledger
            .append(&LedgerEvent::terminal(9, LedgerTag::NoOpendata))
            .await
            .unwrap();

        assert_eq!(
            ledger.lines().await,
            vec!["9,started,attempt_0".to_string(), "9,no_opendata".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rejects_multiline_event() {
        let ledger = MemoryLedger::new();
        let result = ledger.append(&LedgerEvent::failed(1, 0, "line\nbreak")).await;
        assert!(result.is_err());
        assert!(ledger.lines().await.is_empty());
    }
