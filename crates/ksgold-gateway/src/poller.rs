//! 조회 순환 스케줄러.
//!
//! 타이머 틱마다 카운터를 올리고, 임계값에 도달하면 카운터를 0으로 되돌린 뒤
//! 맨 앞의 조회(계좌 → 포지션)를 실행하고 맨 뒤로 보냅니다.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::traits::TradingGateway;

/// 주기적으로 실행되는 조회 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// 계좌 자금 조회
    Account,
    /// 포지션 조회
    Position,
}

/// 고정 크기 순환 배열 기반 조회 스케줄러.
#[derive(Debug)]
pub struct QueryPoller {
    queries: [QueryKind; 2],
    count: u32,
    threshold: u32,
}

impl Default for QueryPoller {
    fn default() -> Self {
        Self::new(2)
    }
}

impl QueryPoller {
    /// 새 스케줄러를 생성합니다. 임계값 0은 1로 취급합니다.
    pub fn new(threshold: u32) -> Self {
        Self {
            queries: [QueryKind::Account, QueryKind::Position],
            count: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold.max(1);
        self.count = 0;
    }

    /// 타이머 틱 하나를 처리하고 실행할 조회를 반환합니다.
    pub fn tick(&mut self) -> Option<QueryKind> {
        self.count += 1;
        if self.count < self.threshold {
            return None;
        }
        self.count = 0;

        let query = self.queries[0];
        self.queries.rotate_left(1);
        Some(query)
    }
}

/// 주기적으로 `on_timer`를 호출하는 태스크를 띄웁니다.
///
/// 호스트 플랫폼에 자체 타이머가 없을 때 사용합니다.
pub fn spawn_query_timer<G>(gateway: Arc<G>, period: Duration) -> JoinHandle<()>
where
    G: TradingGateway + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 첫 틱은 즉시 완료되므로 건너뜀
        ticker.tick().await;

        loop {
            ticker.tick().await;
            gateway.on_timer();
        }
    })
}
