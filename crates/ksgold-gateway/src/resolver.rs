//! 참조 데이터 리졸버.
//!
//! 상품 목록 로드가 끝나기 전에 도착한 주문/체결 보고를 도착 순서대로 보관했다가,
//! 상품 조회의 마지막 페이지를 받은 직후 정확히 한 번 재처리하도록 돌려줍니다.

use std::collections::VecDeque;

/// 리졸버 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverPhase {
    /// 상품 목록 로드 중 (보고를 버퍼에 보관)
    Loading,
    /// 버퍼 재처리 중 (한 번만 진입)
    Replaying,
    /// 로드 완료 (즉시 처리)
    Loaded,
}

/// 보류 이벤트 버퍼를 가진 리졸버.
#[derive(Debug)]
pub struct ReferenceResolver<E> {
    phase: ResolverPhase,
    pending: VecDeque<E>,
}

impl<E> Default for ReferenceResolver<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ReferenceResolver<E> {
    pub fn new() -> Self {
        Self {
            phase: ResolverPhase::Loading,
            pending: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> ResolverPhase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase != ResolverPhase::Loading
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// 이벤트를 받아들입니다.
    ///
    /// 로드 중이면 버퍼에 넣고 `None`을, 아니면 바로 처리하도록 `Some`을 반환합니다.
    pub fn admit(&mut self, event: E) -> Option<E> {
        if self.phase == ResolverPhase::Loading {
            self.pending.push_back(event);
            None
        } else {
            Some(event)
        }
    }

    /// 재처리를 시작하고 보관된 이벤트를 도착 순서대로 꺼냅니다.
    ///
    /// 로드 중일 때만 버퍼를 돌려주며, 이후 호출은 빈 목록을 반환합니다.
    pub fn begin_replay(&mut self) -> VecDeque<E> {
        if self.phase != ResolverPhase::Loading {
            return VecDeque::new();
        }
        self.phase = ResolverPhase::Replaying;
        std::mem::take(&mut self.pending)
    }

    /// 재처리를 마칩니다.
    pub fn finish_replay(&mut self) {
        self.phase = ResolverPhase::Loaded;
        self.pending.clear();
    }
}
