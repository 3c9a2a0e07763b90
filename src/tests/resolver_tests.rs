#[cfg(test)]
mod tests {
    use crate::blockchain::resolver::{estimate_height, height_at_date};
    use crate::config::ChainParams;
    use crate::tests::mock_chain::MockChain;
    use crate::tests::{at_midnight, date, launch_ts, no_delay_policy, test_fetcher};
    use std::sync::Arc;

    #[test]
    fn test_estimate_uses_average_block_time() {
        let chain = ChainParams::monero();
        assert_eq!(estimate_height(&chain, at_midnight(date(2014, 4, 19))), 720);
        assert_eq!(estimate_height(&chain, at_midnight(date(2014, 4, 18))), 0);
        // Dates before launch clamp to genesis.
        assert_eq!(estimate_height(&chain, at_midnight(date(2014, 1, 1))), 0);
    }

    #[tokio::test]
    async fn test_steps_down_to_boundary() {
        // Block h lands at launch + 600 + 120h: height 715 is exactly midnight,
        // 716 is two minutes past it.
        let chain = Arc::new(MockChain::steady(launch_ts() + 600, 120, 2_000));
        let mut fetcher = test_fetcher(chain.clone(), no_delay_policy());

        let height = height_at_date(
            &mut fetcher,
            &ChainParams::monero(),
            1_999,
            at_midnight(date(2014, 4, 19)),
        )
        .await
        .unwrap();

        assert_eq!(height, 715);
        assert_eq!(chain.fetched_heights(), vec![720, 719, 718, 717, 716, 715]);
    }

    #[tokio::test]
    async fn test_steps_up_and_backs_off_one() {
        // Faster blocks than the estimate assumes: one every 100s.
        let chain = Arc::new(MockChain::steady(launch_ts() + 50, 100, 2_000));
        let mut fetcher = test_fetcher(chain.clone(), no_delay_policy());

        let height = height_at_date(
            &mut fetcher,
            &ChainParams::monero(),
            1_999,
            at_midnight(date(2014, 4, 19)),
        )
        .await
        .unwrap();

        assert_eq!(height, 863);
        let target = at_midnight(date(2014, 4, 19)).timestamp();
        assert!(chain.timestamp(863) <= target);
        assert!(chain.timestamp(864) > target);
    }

    #[tokio::test]
    async fn test_launch_day_resolves_to_genesis() {
        let chain = Arc::new(MockChain::steady(launch_ts() + 600, 120, 100));
        let mut fetcher = test_fetcher(chain, no_delay_policy());

        let height = height_at_date(
            &mut fetcher,
            &ChainParams::monero(),
            99,
            at_midnight(date(2014, 4, 18)),
        )
        .await
        .unwrap();

        assert_eq!(height, 0);
    }

    #[tokio::test]
    async fn test_future_target_resolves_to_tip() {
        let chain = Arc::new(MockChain::steady(launch_ts() + 60, 120, 100));
        let mut fetcher = test_fetcher(chain.clone(), no_delay_policy());

        let height = height_at_date(
            &mut fetcher,
            &ChainParams::monero(),
            99,
            at_midnight(date(2014, 5, 1)),
        )
        .await
        .unwrap();

        assert_eq!(height, 99);
        assert!(chain.fetched_heights().iter().all(|h| *h <= 99));
    }

    #[tokio::test]
    async fn test_resolution_is_monotonic() {
        let chain = Arc::new(MockChain::steady(launch_ts() + 30, 110, 5_000));
        let mut fetcher = test_fetcher(chain, no_delay_policy());
        let params = ChainParams::monero();

        let mut previous = 0;
        for day in 18..=24 {
            let height = height_at_date(&mut fetcher, &params, 4_999, at_midnight(date(2014, 4, day)))
                .await
                .unwrap();
            assert!(height >= previous, "height {} for day {} went backwards", height, day);
            previous = height;
        }
    }
}
