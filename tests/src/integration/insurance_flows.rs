//! # Insurance and Flight-Status Flows
//!
//! User actions on top of a bootstrapped session, plus the layout where an
//! airline candidate operates the flights.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, ACCOUNTS};
    use fs_01_contract_gateway::{ether, parse_ether, ContractMethod, InMemoryChain, Wei};
    use fs_03_bootstrap::{Pool, PoolPhase};
    use fs_04_presentation::PresentationError;
    use std::sync::Arc;
    use surety_runtime::{CacheMode, Session};

    async fn bootstrapped(chain: Arc<InMemoryChain>) -> Session<InMemoryChain> {
        let session = fixtures::open(chain, CacheMode::Memory).await;
        assert!(session.bootstrap().await.is_converged());
        session
    }

    #[tokio::test]
    async fn test_passenger_buys_insurance_on_published_flight() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = bootstrapped(chain.clone()).await;
        let alice = session.resolve_account("Alice").unwrap();
        let premium = parse_ether("0.5").unwrap();

        let receipt = session
            .buy_insurance(alice, "UA0815", premium)
            .await
            .unwrap();
        assert!(receipt.block_number.is_some());

        let policies = chain.policies();
        assert_eq!(policies.len(), 1);
        let record = session
            .view()
            .flights()
            .into_iter()
            .find(|f| f.flight == "UA0815")
            .unwrap();
        assert_eq!(policies[0].passenger, alice);
        assert_eq!(policies[0].airline, chain.account_list()[0]);
        assert_eq!(policies[0].timestamp, record.timestamp);
        assert_eq!(policies[0].premium, premium);
    }

    #[tokio::test]
    async fn test_premium_outside_cap_never_reaches_chain() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = bootstrapped(chain.clone()).await;
        let bob = session.resolve_account("Bob").unwrap();

        for premium in [Wei::zero(), ether(2), parse_ether("1.000000000000000001").unwrap()] {
            let err = session
                .buy_insurance(bob, "ND1309", premium)
                .await
                .unwrap_err();
            assert!(matches!(err, PresentationError::InvalidPremium { .. }));
        }
        assert!(chain.calls_of(ContractMethod::BuyInsurance).is_empty());

        session.buy_insurance(bob, "ND1309", ether(1)).await.unwrap();
        assert_eq!(chain.policies().len(), 1);
    }

    #[tokio::test]
    async fn test_airline_account_cannot_buy_insurance() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = bootstrapped(chain.clone()).await;
        let delta = chain.account_list()[1];

        let err = session
            .buy_insurance(delta, "ND1309", ether(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PresentationError::UnknownPassenger(a) if a == delta));
    }

    #[tokio::test]
    async fn test_unpublished_flight_is_unknown() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        chain.fail_on(ContractMethod::RegisterFlight, 3);
        let session = fixtures::open(chain.clone(), CacheMode::Memory).await;
        let report = session.bootstrap().await;
        assert!(report.flights.is_err());

        let alice = session.resolve_account("Alice").unwrap();
        let err = session
            .buy_insurance(alice, "AA2201", ether(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PresentationError::UnknownFlight(code) if code == "AA2201"));

        // Flights published before the failure stay usable.
        session.buy_insurance(alice, "ND1309", ether(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_request_by_passenger_or_operator() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = bootstrapped(chain.clone()).await;
        let owner = chain.account_list()[0];
        let bob = session.resolve_account("Bob").unwrap();

        session.request_flight_status(bob, "AA2201").await.unwrap();
        session.request_flight_status(owner, "AA2201").await.unwrap();
        assert_eq!(chain.status_request_count(), 2);

        let united = chain.account_list()[2];
        let err = session
            .request_flight_status(united, "AA2201")
            .await
            .unwrap_err();
        assert!(matches!(err, PresentationError::UnknownRequester(_)));
        assert_eq!(chain.status_request_count(), 2);
    }

    #[tokio::test]
    async fn test_reverted_purchase_surfaces_chain_error() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let session = bootstrapped(chain.clone()).await;
        chain.fail_always(ContractMethod::BuyInsurance);
        let alice = session.resolve_account("Alice").unwrap();

        let err = session
            .buy_insurance(alice, "ND1309", ether(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PresentationError::Chain(_)));
        assert!(chain.policies().is_empty());
    }

    #[tokio::test]
    async fn test_airline_candidate_operates_flights() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let united = chain.account_list()[2];
        let mut config = fixtures::config();
        config.roles.flight_operator = Some(2);

        let session = Session::open(chain.clone(), &config, fixtures::seed(), CacheMode::Memory)
            .await
            .unwrap();
        assert!(session.roles().operator_is_candidate());
        assert!(session.bootstrap().await.is_converged());

        let calls = chain.calls();
        let funded = calls
            .iter()
            .position(|c| c.method == ContractMethod::FundAirline && c.from == Some(united))
            .unwrap();
        let first_flight = calls
            .iter()
            .position(|c| c.method == ContractMethod::RegisterFlight)
            .unwrap();
        assert!(funded < first_flight);

        for flight in session.view().flights() {
            assert_eq!(flight.airline_address, united);
            assert_eq!(flight.airline_name.as_deref(), Some("United"));
        }
        assert!(chain
            .calls_of(ContractMethod::RegisterFlight)
            .iter()
            .all(|c| c.from == Some(united)));
        assert_eq!(session.view().phase(Pool::Flights), PoolPhase::Converged);

        // The operating airline may ask for status of its own flight.
        session.request_flight_status(united, "ND1309").await.unwrap();
    }

    #[tokio::test]
    async fn test_operator_overlapping_passenger_slot_is_rejected() {
        let chain = Arc::new(InMemoryChain::new(ACCOUNTS));
        let mut config = fixtures::config();
        config.roles.flight_operator = Some(3);

        let result = Session::open(chain, &config, fixtures::seed(), CacheMode::Memory).await;
        assert!(result.is_err());
    }
}
