//! # Recovery Flows
//!
//! Restarts against the same chain with a file-backed cache: resuming at the
//! persisted cursor, funding a registered-but-unfunded airline, editing the
//! seed between runs, and discarding unusable cache files.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, ACCOUNTS};
    use fs_01_contract_gateway::{ContractMethod, InMemoryChain};
    use fs_02_convergence_cache::{
        progress_key, CacheEnvelope, SeedDigest, FLIGHTS_KEY, REGISTERED_AIRLINES_KEY,
    };
    use fs_03_bootstrap::{Pool, PoolPhase, SeedDataset, SeedFlight};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Arc;
    use surety_runtime::{CacheMode, Session};

    fn read_store(path: &Path) -> BTreeMap<String, String> {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_restart_resumes_flight_pool_at_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        chain.fail_on(ContractMethod::RegisterFlight, 2);

        {
            let session = fixtures::open(chain.clone(), CacheMode::File(path.clone())).await;
            let report = session.bootstrap().await;
            assert!(report.flights.is_err());
        }

        let store = read_store(&path);
        assert!(store.contains_key(REGISTERED_AIRLINES_KEY));
        assert!(store.contains_key(&progress_key(FLIGHTS_KEY)));
        assert!(!store.contains_key(FLIGHTS_KEY));

        chain.clear_failures();
        let session = fixtures::open(chain.clone(), CacheMode::File(path.clone())).await;
        assert!(session.bootstrap().await.is_converged());

        let attempted: Vec<_> = chain
            .calls_of(ContractMethod::RegisterFlight)
            .into_iter()
            .filter_map(|c| c.subject)
            .collect();
        assert_eq!(attempted, vec!["ND1309", "UA0815", "UA0815", "AA2201"]);
        assert_eq!(chain.flight_codes(), vec!["ND1309", "UA0815", "AA2201"]);

        let codes: Vec<_> = session
            .view()
            .flights()
            .into_iter()
            .map(|f| f.flight)
            .collect();
        assert_eq!(codes, vec!["ND1309", "UA0815", "AA2201"]);

        let store = read_store(&path);
        assert!(store.contains_key(FLIGHTS_KEY));
        assert!(!store.contains_key(&progress_key(FLIGHTS_KEY)));
    }

    #[tokio::test]
    async fn test_registered_but_unfunded_airline_is_only_funded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let delta = chain.account_list()[1];
        chain.fail_on(ContractMethod::FundAirline, 1);

        {
            let session = fixtures::open(chain.clone(), CacheMode::File(path.clone())).await;
            let report = session.bootstrap().await;
            assert!(report.airlines.is_err());
            assert!(session.view().airlines().is_empty());
        }
        assert!(!chain.is_active_airline(&delta));
        assert!(chain.airline_name(&delta).is_some());

        chain.clear_failures();
        let session = fixtures::open(chain.clone(), CacheMode::File(path)).await;
        assert!(session.bootstrap().await.is_converged());

        let delta_registrations = chain
            .calls_of(ContractMethod::RegisterAirline)
            .into_iter()
            .filter(|c| c.subject.as_deref() == Some(delta.to_string().as_str()))
            .count();
        assert_eq!(delta_registrations, 1);
        assert_eq!(chain.calls_of(ContractMethod::FundAirline).len(), 3);
        assert!(chain.is_active_airline(&delta));
        assert_eq!(session.view().airlines().len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_file_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"{not json").unwrap();

        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = fixtures::open(chain.clone(), CacheMode::File(path.clone())).await;
        assert!(session.bootstrap().await.is_converged());

        assert_eq!(
            std::fs::read(path.with_extension("corrupt")).unwrap(),
            b"{not json"
        );
        assert_eq!(chain.calls_of(ContractMethod::RegisterAirline).len(), 2);
        assert!(read_store(&path).contains_key(FLIGHTS_KEY));
    }

    #[tokio::test]
    async fn test_unknown_schema_version_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut stale = CacheEnvelope::wrap(&SeedDigest::of_bytes(b"any"), json!([]));
        stale.version = 99;
        let store: BTreeMap<_, _> = [(
            FLIGHTS_KEY.to_string(),
            serde_json::to_string(&stale).unwrap(),
        )]
        .into_iter()
        .collect();
        std::fs::write(&path, serde_json::to_vec(&store).unwrap()).unwrap();

        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = fixtures::open(chain.clone(), CacheMode::File(path)).await;
        assert!(session.bootstrap().await.is_converged());

        assert_eq!(chain.calls_of(ContractMethod::RegisterFlight).len(), 3);
        assert_eq!(session.view().flights().len(), 3);
    }

    fn seed_with_extra_flight() -> SeedDataset {
        let mut seed = fixtures::seed();
        seed.flights.push(SeedFlight {
            flight: "DL0042".to_string(),
            timestamp: "2024-07-04T12:00:00Z".to_string(),
        });
        seed
    }

    async fn reopen(
        chain: &Arc<InMemoryChain>,
        path: &Path,
        seed: SeedDataset,
    ) -> Session<InMemoryChain> {
        Session::open(
            chain.clone(),
            &fixtures::config(),
            seed,
            CacheMode::File(path.to_path_buf()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_added_flight_on_same_chain_registers_only_the_new_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        {
            let session = reopen(&chain, &path, fixtures::seed()).await;
            assert!(session.bootstrap().await.is_converged());
        }
        let writes = chain.write_count();

        let session = reopen(&chain, &path, seed_with_extra_flight()).await;
        let report = session.bootstrap().await;

        assert!(report.is_converged(), "{:?} / {:?}", report.airlines, report.flights);
        assert_eq!(chain.write_count(), writes + 1);
        assert_eq!(chain.calls_of(ContractMethod::RegisterAirline).len(), 2);
        assert_eq!(chain.calls_of(ContractMethod::FundAirline).len(), 2);
        assert_eq!(
            chain.flight_codes(),
            vec!["ND1309", "UA0815", "AA2201", "DL0042"]
        );
        let codes: Vec<_> = session
            .view()
            .flights()
            .into_iter()
            .map(|f| f.flight)
            .collect();
        assert_eq!(codes, vec!["ND1309", "UA0815", "AA2201", "DL0042"]);
        assert_eq!(session.view().phase(Pool::Airlines), PoolPhase::Converged);

        // The edited seed is now converged in its own right.
        drop(session);
        let calls = chain.calls().len();
        let session = reopen(&chain, &path, seed_with_extra_flight()).await;
        assert!(session.bootstrap().await.is_converged());
        assert!(chain.calls()[calls..]
            .iter()
            .all(|c| c.method != ContractMethod::RegisterFlight
                && c.method != ContractMethod::FundAirline));
    }

    #[tokio::test]
    async fn test_airline_edits_on_same_chain_send_nothing_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let united = chain.account_list()[2];
        {
            let session = reopen(&chain, &path, fixtures::seed()).await;
            assert!(session.bootstrap().await.is_converged());
        }
        let writes = chain.write_count();

        let mut seed = fixtures::seed();
        seed.airlines[1] = "United Airlines".to_string();
        seed.first_airline = Some("Udacity Airways".to_string());
        let session = reopen(&chain, &path, seed).await;
        let report = session.bootstrap().await;

        assert!(report.is_converged(), "{:?}", report.airlines);
        assert_eq!(chain.write_count(), writes);
        let airlines = session.view().airlines();
        assert_eq!(airlines.len(), 2);
        assert_eq!(airlines[1].address, united);
        assert_eq!(airlines[1].name, "United Airlines");
        // The contract keeps the name it was registered with.
        assert_eq!(chain.airline_name(&united).as_deref(), Some("United"));
        let flights = session.view().flights();
        assert_eq!(flights.len(), 3);
        assert!(flights
            .iter()
            .all(|f| f.airline_name.as_deref() == Some("Udacity Airways")));

        // Dropping an airline keeps the remaining one without new calls.
        drop(session);
        let mut seed = fixtures::seed();
        seed.airlines.truncate(1);
        let session = reopen(&chain, &path, seed).await;
        assert!(session.bootstrap().await.is_converged());
        assert_eq!(chain.write_count(), writes);
        assert_eq!(session.view().airlines().len(), 1);
    }

    #[tokio::test]
    async fn test_cleared_cache_reruns_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        {
            let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
            let session = fixtures::open(chain, CacheMode::File(path.clone())).await;
            assert!(session.bootstrap().await.is_converged());
            assert_eq!(session.cache().clear().unwrap(), 2);
        }

        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = fixtures::open(chain.clone(), CacheMode::File(path)).await;
        assert!(session.bootstrap().await.is_converged());
        assert_eq!(chain.write_count(), 1 + 2 * 2 + 3);
        assert_eq!(session.view().phase(Pool::Flights), PoolPhase::Converged);
    }
}
