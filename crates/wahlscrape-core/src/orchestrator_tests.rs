
    use super::*;
    use crate::testing::{self, FakeFactory, FakeSite, detail_page, results_page};
    use tempfile::TempDir;
    use wahlscrape_ledger::{MemoryLedger, resolved_indices};

    const DETAIL: &str = "https://wahlen.example/bad-kreuznach/";
    const ELECTION: &str = "https://wahlen.example/bad-kreuznach/btw/";
    const RESULTS: &str = "https://wahlen.example/bad-kreuznach/btw/ergebnis.html";

    struct Harness {
        _dir: TempDir,
        factory: Arc<FakeFactory>,
        ledger: Arc<MemoryLedger>,
        orchestrator: ScrapeOrchestrator,
    }

    fn harness(factory: FakeFactory) -> Harness {
        let dir = TempDir::new().unwrap();
        let settings = Arc::new(testing::settings(dir.path()));
        let factory = Arc::new(factory);
        let ledger = Arc::new(MemoryLedger::new());
        let orchestrator = ScrapeOrchestrator::new(settings, factory.clone(), ledger.clone());
        Harness {
            _dir: dir,
            factory,
            ledger,
            orchestrator,
        }
    }

    fn idx(i: u32) -> MunicipalityIndex {
        MunicipalityIndex::new(i).unwrap()
    }

    #[tokio::test]
    async fn test_happy_path_writes_result_and_success() {
        let h = harness(FakeFactory::new(testing::happy_site()));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        let ScrapeOutcome::Success { name, links, path } = outcome else {
            panic!("unexpected outcome");
        };
        assert_eq!(name, "Bad Kreuznach");
        assert_eq!(links, 3);
        assert!(path.ends_with("Bad_Kreuznach_data_links.csv"));

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "text,url");
        assert_eq!(
            lines[1],
            "Wahlbezirke,https://wahlen.example/bad-kreuznach/btw/open_data_wahlbezirke.csv"
        );

        assert_eq!(
            h.ledger.lines().await,
            vec!["13,started,attempt_0".to_string(), "13,success".to_string()]
        );
        assert_eq!(h.factory.opened(), 1);
        assert_eq!(h.factory.log().last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn test_always_faulting_session_exhausts_budget() {
        let h = harness(FakeFactory::new(FakeSite::new()));

        let outcome = h.orchestrator.scrape(idx(7)).await;

        assert!(matches!(outcome, ScrapeOutcome::Exhausted { attempts: 2, .. }));
        assert!(!outcome.is_resolved());

        let lines = h.ledger.lines().await;
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "7,started,attempt_0");
        assert!(lines[1].starts_with("7,failed,attempt_0,[Init] Navigation failed"));
        assert_eq!(lines[2], "7,started,attempt_1");
        assert!(lines[3].starts_with("7,failed,attempt_1,[Init]"));
        assert_eq!(lines[4], "7,exhausted,attempts_2");

        assert!(resolved_indices(&*h.ledger).await.unwrap().is_empty());
        assert_eq!(h.factory.log().iter().filter(|e| *e == "close").count(), 2);
    }

    #[tokio::test]
    async fn test_excluded_region_is_terminal() {
        let h = harness(FakeFactory::new(testing::happy_site()));

        let outcome = h.orchestrator.scrape(idx(12)).await;

        assert_eq!(outcome, ScrapeOutcome::Terminal(TerminalReason::RegionExcluded));
        assert_eq!(
            h.ledger.lines().await,
            vec!["12,started,attempt_0".to_string(), "12,bayern_skip".to_string()]
        );
        assert_eq!(h.factory.opened(), 1);
    }

    #[tokio::test]
    async fn test_missing_election_table_is_terminal() {
        let site = testing::happy_site().page(DETAIL, "<html><body><p>Keine Wahlen</p></body></html>");
        let h = harness(FakeFactory::new(site));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        assert_eq!(outcome, ScrapeOutcome::Terminal(TerminalReason::ElectionAbsent));
        assert_eq!(h.ledger.lines().await[1], "13,no_bundestagswahl");
    }

    #[tokio::test]
    async fn test_missing_open_data_is_terminal() {
        let site = testing::happy_site().page(RESULTS, results_page(None));
        let h = harness(FakeFactory::new(site));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        assert_eq!(outcome, ScrapeOutcome::Terminal(TerminalReason::OpenDataMissing));
        assert_eq!(
            h.ledger.lines().await,
            vec!["13,started,attempt_0".to_string(), "13,no_opendata".to_string()]
        );
        assert!(h.factory.log().iter().any(|e| e.starts_with("click 'a.dropdown-toggle'")));
    }

    #[tokio::test]
    async fn test_unmatched_election_row_is_retried() {
        let site = testing::happy_site().page(
            DETAIL,
            detail_page(&[("2021", "Landtagswahl", "/bad-kreuznach/ltw/")]),
        );
        let h = harness(FakeFactory::new(site));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        assert!(matches!(outcome, ScrapeOutcome::Exhausted { .. }));
        let lines = h.ledger.lines().await;
        assert_eq!(
            lines[1],
            "13,failed,attempt_0,[ElectionTableChecked] No 2021 bundestag link found"
        );
    }

    #[tokio::test]
    async fn test_dialog_after_election_click_is_fault() {
        let detail = "<html><body><table><tbody><tr><td>2021</td><td>\
            <a href=\"/bad-kreuznach/btw/\" data-alert=\"Die Seite ist nicht erreichbar\">Bundestagswahl</a>\
            </td></tr></tbody></table></body></html>";
        let site = testing::happy_site().page(DETAIL, detail);
        let h = harness(FakeFactory::new(site));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        let ScrapeOutcome::Exhausted { last_error, .. } = outcome else {
            panic!("unexpected outcome");
        };
        assert_eq!(
            last_error,
            "[ElectionResolved] Unexpected alert: Die Seite ist nicht erreichbar"
        );
        let failed = h
            .ledger
            .lines()
            .await
            .into_iter()
            .filter(|l| l.contains(",failed,"))
            .count();
        assert_eq!(failed, 2);
    }

    #[tokio::test]
    async fn test_missing_more_link_is_distinct_fault() {
        let site = testing::happy_site().page(ELECTION, "<html><body>Ergebnisse folgen</body></html>");
        let h = harness(FakeFactory::new(site));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        let ScrapeOutcome::Exhausted { last_error, .. } = outcome else {
            panic!("unexpected outcome");
        };
        assert!(last_error.starts_with("[ElectionClicked] 'mehr' link not found: Timed out"));
    }

    #[tokio::test]
    async fn test_launch_failure_consumes_attempt() {
        let h = harness(FakeFactory::new(testing::happy_site()).failing_first(1));

        let outcome = h.orchestrator.scrape(idx(13)).await;

        assert!(matches!(outcome, ScrapeOutcome::Success { .. }));
        assert_eq!(
            h.ledger.lines().await,
            vec![
                "13,started,attempt_0".to_string(),
                "13,failed,attempt_0,[Init] Failed to launch Chrome: Chrome exited during startup"
                    .to_string(),
                "13,started,attempt_1".to_string(),
                "13,success".to_string(),
            ]
        );
        assert_eq!(h.factory.opened(), 2);
    }

    #[tokio::test]
    async fn test_detail_is_truncated() {
        let dir = TempDir::new().unwrap();
        let mut settings = testing::settings(dir.path());
        settings.scrape.max_attempts = 1;
        settings.scrape.detail_max_chars = 20;
        let ledger = Arc::new(MemoryLedger::new());
        let orchestrator = ScrapeOrchestrator::new(
            Arc::new(settings),
            Arc::new(FakeFactory::new(FakeSite::new())),
            ledger.clone(),
        );

        orchestrator.scrape(idx(1)).await;

        let lines = ledger.lines().await;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,failed,attempt_0,[Init] Navigation fa");
        assert_eq!(lines[2], "1,exhausted,attempts_1");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ScrapeState::ElectionTableChecked.to_string(), "ElectionTableChecked");
    }

