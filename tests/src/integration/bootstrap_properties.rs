//! # Bootstrap Properties
//!
//! End-to-end checks of the bootstrap guarantees through the full stack:
//! simulated contracts → orchestrator → convergence cache → presentation view.
//!
//! | Property | Test |
//! |----------|------|
//! | Cache hit is free | `test_cache_hit_issues_no_pool_calls` |
//! | Positional mapping | `test_positional_mapping` |
//! | Register before fund | `test_fund_follows_register_per_candidate` |
//! | Fail-fast flight pool | `test_flight_failure_on_second_of_three` |
//! | Authorization gate | `test_authorization_precedes_registration` |
//! | Loading flag monotonic | `test_loading_flags_never_return_to_true` |

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, ObservedChain, ACCOUNTS};
    use fs_01_contract_gateway::{ContractMethod, InMemoryChain, RecordedCall};
    use fs_02_convergence_cache::{FLIGHTS_KEY, REGISTERED_AIRLINES_KEY};
    use fs_03_bootstrap::{AirlineRecord, FlightRecord, Pool, PoolPhase};
    use std::sync::Arc;
    use surety_runtime::CacheMode;

    const POOL_METHODS: [ContractMethod; 4] = [
        ContractMethod::IsAirline,
        ContractMethod::RegisterAirline,
        ContractMethod::FundAirline,
        ContractMethod::RegisterFlight,
    ];

    fn pool_calls(calls: &[RecordedCall]) -> usize {
        calls
            .iter()
            .filter(|c| POOL_METHODS.contains(&c.method))
            .count()
    }

    fn position(calls: &[RecordedCall], method: ContractMethod, subject: &str) -> usize {
        calls
            .iter()
            .position(|c| c.method == method && c.subject.as_deref() == Some(subject))
            .unwrap()
    }

    // =========================================================================
    // CACHE HIT
    // =========================================================================

    #[tokio::test]
    async fn test_cache_hit_issues_no_pool_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));

        let (airlines, flights) = {
            let first = fixtures::open(chain.clone(), CacheMode::File(path.clone())).await;
            assert!(first.bootstrap().await.is_converged());
            (first.view().airlines(), first.view().flights())
        };
        let before = pool_calls(&chain.calls());

        let second = fixtures::open(chain.clone(), CacheMode::File(path)).await;
        let report = second.bootstrap().await;

        assert!(report.is_converged());
        assert_eq!(pool_calls(&chain.calls()), before);
        assert_eq!(second.view().airlines(), airlines);
        assert_eq!(second.view().flights(), flights);
        assert_eq!(second.view().phase(Pool::Airlines), PoolPhase::Converged);
        assert_eq!(second.view().phase(Pool::Flights), PoolPhase::Converged);
    }

    // =========================================================================
    // POSITIONAL MAPPING
    // =========================================================================

    #[tokio::test]
    async fn test_positional_mapping() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let accounts = chain.account_list().to_vec();
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;

        session.bootstrap().await;

        assert_eq!(
            session.view().airlines(),
            vec![
                AirlineRecord {
                    address: accounts[1],
                    name: "Delta".to_string(),
                },
                AirlineRecord {
                    address: accounts[2],
                    name: "United".to_string(),
                },
            ]
        );
        let passengers = session.view().passengers();
        assert_eq!(passengers[0].address, accounts[3]);
        assert_eq!(passengers[1].name, "Bob");
        assert_eq!(chain.airline_name(&accounts[2]).as_deref(), Some("United"));
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    #[tokio::test]
    async fn test_fund_follows_register_per_candidate() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let accounts = chain.account_list().to_vec();
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;
        session.bootstrap().await;

        let calls = chain.calls();
        let delta = accounts[1].to_string();
        let united = accounts[2].to_string();

        let register_delta = position(&calls, ContractMethod::RegisterAirline, &delta);
        let fund_delta = position(&calls, ContractMethod::FundAirline, &delta);
        let register_united = position(&calls, ContractMethod::RegisterAirline, &united);
        let fund_united = position(&calls, ContractMethod::FundAirline, &united);

        assert!(register_delta < fund_delta);
        assert!(fund_delta < register_united);
        assert!(register_united < fund_united);

        let funders: Vec<_> = chain
            .calls_of(ContractMethod::FundAirline)
            .into_iter()
            .map(|c| c.from)
            .collect();
        assert_eq!(funders, vec![Some(accounts[1]), Some(accounts[2])]);
    }

    #[tokio::test]
    async fn test_authorization_precedes_registration() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;
        session.bootstrap().await;

        let calls = chain.calls();
        let authorize: Vec<_> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.method == ContractMethod::AuthorizeContract)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(authorize.len(), 1);

        let first_write = calls
            .iter()
            .position(|c| {
                matches!(
                    c.method,
                    ContractMethod::RegisterAirline | ContractMethod::RegisterFlight
                )
            })
            .unwrap();
        assert!(authorize[0] < first_write);
        assert_eq!(
            calls[authorize[0]].from,
            Some(chain.account_list()[0]),
            "authorization is sent by the owner"
        );
    }

    #[tokio::test]
    async fn test_failed_authorization_blocks_every_registration() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        chain.fail_always(ContractMethod::AuthorizeContract);
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;

        let report = session.bootstrap().await;

        assert!(report.authorization.is_err());
        assert!(report.airlines.is_err());
        assert!(report.flights.is_err());
        assert_eq!(pool_calls(&chain.calls()), 0);
        assert!(matches!(
            session.view().phase(Pool::Airlines),
            PoolPhase::Failed { .. }
        ));
        assert!(!session.view().is_loading(Pool::Flights));
    }

    // =========================================================================
    // FAIL-FAST
    // =========================================================================

    #[tokio::test]
    async fn test_flight_failure_on_second_of_three() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        chain.fail_on(ContractMethod::RegisterFlight, 2);
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;

        let report = session.bootstrap().await;

        assert!(report.airlines.is_ok());
        assert!(report.flights.is_err());
        assert_eq!(chain.calls_of(ContractMethod::RegisterFlight).len(), 2);

        let cached: Option<Vec<FlightRecord>> =
            session.cache().load_any_seed(FLIGHTS_KEY).unwrap();
        assert!(cached.is_none());
        let airlines: Option<Vec<AirlineRecord>> = session
            .cache()
            .load_any_seed(REGISTERED_AIRLINES_KEY)
            .unwrap();
        assert_eq!(airlines.map(|a| a.len()), Some(2));

        let published = session.view().flights();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].flight, "ND1309");
        assert!(matches!(
            session.view().phase(Pool::Flights),
            PoolPhase::Failed { .. }
        ));
        assert!(!session.view().is_loading(Pool::Flights));
    }

    // =========================================================================
    // PRESENTATION
    // =========================================================================

    #[tokio::test]
    async fn test_each_candidate_visible_before_the_next_starts() {
        let chain = Arc::new(ObservedChain::new(ACCOUNTS));
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;
        chain.attach(session.view().clone());

        assert!(session.bootstrap().await.is_converged());

        let funds: Vec<usize> = chain
            .observations()
            .iter()
            .filter(|o| o.method == ContractMethod::FundAirline)
            .map(|o| o.airlines_visible)
            .collect();
        assert_eq!(funds, vec![0, 1]);

        let flights: Vec<usize> = chain
            .observations()
            .iter()
            .filter(|o| o.method == ContractMethod::RegisterFlight)
            .map(|o| o.flights_visible)
            .collect();
        assert_eq!(flights, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_loading_flags_never_return_to_true() {
        let chain = Arc::new(ObservedChain::new(ACCOUNTS));
        chain.inner.fail_on(ContractMethod::RegisterFlight, 2);
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;
        chain.attach(session.view().clone());

        let mut airlines_rx = session.view().subscribe_loading(Pool::Airlines);
        let mut flights_rx = session.view().subscribe_loading(Pool::Flights);
        assert!(*airlines_rx.borrow_and_update());
        assert!(*flights_rx.borrow_and_update());

        // Fails on the second flight, then a retry in the same session converges.
        assert!(!session.bootstrap().await.is_converged());
        assert!(!session.view().is_loading(Pool::Flights));
        assert!(session.bootstrap().await.is_converged());

        for rx in [&mut airlines_rx, &mut flights_rx] {
            assert!(!*rx.borrow_and_update());
        }

        let observations = chain.observations();
        let mut seen_flights_cleared = false;
        let mut seen_airlines_cleared = false;
        for o in &observations {
            seen_airlines_cleared |= !o.airlines_loading;
            seen_flights_cleared |= !o.flights_loading;
            assert!(!(seen_airlines_cleared && o.airlines_loading));
            assert!(!(seen_flights_cleared && o.flights_loading));
        }
        assert!(seen_flights_cleared);
        assert_eq!(session.view().flights().len(), 3);
    }

    #[tokio::test]
    async fn test_operational_status_published_once() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        chain.set_operational(false);
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;

        let report = session.bootstrap().await;

        assert!(!report.operational);
        assert!(!session.view().operational_status());
        assert_eq!(chain.calls_of(ContractMethod::IsOperational).len(), 1);
        // The App contract refuses airlines while paused; flights are independent.
        assert!(report.airlines.is_err());
        assert!(report.flights.is_ok());
    }
}
