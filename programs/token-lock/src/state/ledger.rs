use anchor_lang::prelude::*;

use crate::constants::{INDEX_PAGE_CAPACITY, MAX_PAGE_IDS};
use crate::error::LockError;
use crate::events::{CloseReason, LockClosed};
use crate::state::Lock;

/// Singleton PDA: id counter plus the size of the active index.
#[account]
#[derive(Default, Debug)]
pub struct Ledger {
    /// Next id to assign. Starts at 0, never reset.
    pub next_lock_id: u64,
    /// Number of active locks. Positions `0..active_count` are filled across index pages.
    pub active_count: u64,
    pub bump: u8,
}

/// One page of the active index (PDA `["index", page_no]`).
/// Unordered: removal swaps the last id into the freed slot.
#[account]
#[derive(Default, Debug)]
pub struct IndexPage {
    pub page_no: u64,
    pub ids: Vec<u64>,
    pub bump: u8,
}

/// Page number and in-page offset of an index position.
pub fn locate(slot: u64) -> (u64, usize) {
    (
        slot / INDEX_PAGE_CAPACITY,
        (slot % INDEX_PAGE_CAPACITY) as usize,
    )
}

impl Ledger {
    pub const SIZE: usize =
        8 + // next_lock_id
        8 + // active_count
        1;  // bump

    /// Page that receives the next registered id.
    pub fn tail_page(&self) -> u64 {
        self.active_count / INDEX_PAGE_CAPACITY
    }

    /// Assigns the next id and appends it to `tail`. Returns `(id, slot)`.
    pub fn register(&mut self, tail: &mut IndexPage) -> Result<(u64, u64)> {
        let id = self.next_lock_id;
        let slot = self.active_count;
        let next_lock_id = id.checked_add(1).ok_or(LockError::MathOverflow)?;
        let active_count = slot.checked_add(1).ok_or(LockError::MathOverflow)?;

        let (page_no, offset) = locate(slot);
        tail.append(page_no, offset, id)?;

        self.next_lock_id = next_lock_id;
        self.active_count = active_count;
        Ok((id, slot))
    }

    /// Swap-and-shrink removal of `lock_id` from `slot`. Touches only the page holding
    /// `slot` and, when different, the page holding the last position.
    /// Returns the id that now occupies `slot`, if any.
    pub fn unregister(
        &mut self,
        lock_id: u64,
        slot: u64,
        slot_page: &mut IndexPage,
        last_page: Option<&mut IndexPage>,
    ) -> Result<Option<u64>> {
        require!(slot < self.active_count, LockError::ActiveIndexCorrupt);
        let last = self.active_count - 1;
        let (page_no, offset) = locate(slot);
        let (last_page_no, last_offset) = locate(last);
        require!(
            slot_page.page_no == page_no && slot_page.ids.get(offset) == Some(&lock_id),
            LockError::ActiveIndexCorrupt
        );

        let moved = if last_page_no == page_no {
            require!(last_page.is_none(), LockError::IndexPageMismatch);
            require!(
                slot_page.ids.len() == last_offset + 1,
                LockError::ActiveIndexCorrupt
            );
            slot_page.ids.swap_remove(offset);
            slot_page.ids.get(offset).copied()
        } else {
            let last_page = last_page.ok_or(LockError::IndexPageMismatch)?;
            require!(
                last_page.page_no == last_page_no,
                LockError::IndexPageMismatch
            );
            require!(
                last_page.ids.len() == last_offset + 1,
                LockError::ActiveIndexCorrupt
            );
            let moved_id = last_page.ids.pop().ok_or(LockError::ActiveIndexCorrupt)?;
            slot_page.ids[offset] = moved_id;
            Some(moved_id)
        };

        self.active_count = last;
        Ok(moved)
    }

    /// `unregister` plus repointing the lock that filled the freed slot.
    pub fn unlink(
        &mut self,
        lock_id: u64,
        slot: u64,
        slot_page: &mut IndexPage,
        last_page: Option<&mut IndexPage>,
        moved: Option<&mut Lock>,
    ) -> Result<()> {
        if let Some(moved_id) = self.unregister(lock_id, slot, slot_page, last_page)? {
            let moved = moved.ok_or(LockError::MovedLockMismatch)?;
            moved.relink(moved_id, slot)?;
        }
        Ok(())
    }

    /// Drops a closing lock from the index and builds its closure event.
    pub fn retire(
        &mut self,
        lock: &Lock,
        slot_page: &mut IndexPage,
        last_page: Option<&mut IndexPage>,
        moved: Option<&mut Lock>,
        reason: CloseReason,
    ) -> Result<LockClosed> {
        self.unlink(lock.id, lock.slot, slot_page, last_page, moved)?;
        Ok(LockClosed {
            lock_id: lock.id,
            creator: lock.creator,
            asset: lock.asset,
            amount: lock.amount,
            reason,
        })
    }
}

impl IndexPage {
    /// Space for discriminator + page number + a full page of ids.
    pub const fn space() -> usize {
        8 + 8 + 4 + 8 * INDEX_PAGE_CAPACITY as usize + 1
    }

    /// Sets identity on a page created by `init_if_needed`; a no-op for existing pages.
    pub fn claim(&mut self, page_no: u64, bump: u8) {
        if self.ids.is_empty() {
            self.page_no = page_no;
            self.bump = bump;
        }
    }

    pub fn append(&mut self, page_no: u64, offset: usize, id: u64) -> Result<()> {
        require!(
            self.page_no == page_no
                && self.ids.len() == offset
                && offset < INDEX_PAGE_CAPACITY as usize,
            LockError::ActiveIndexCorrupt
        );
        self.ids.push(id);
        Ok(())
    }
}

/// Up to `limit` ids from position `offset`, read from consecutive `pages` starting with the
/// page holding `offset`. `limit` is clamped to `MAX_PAGE_IDS`.
pub fn page_ids(
    active_count: u64,
    pages: &[IndexPage],
    offset: u64,
    limit: u32,
) -> Result<Vec<u64>> {
    let end = active_count.min(offset.saturating_add(limit.min(MAX_PAGE_IDS) as u64));
    if offset >= end {
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity((end - offset) as usize);
    let mut supplied = pages.iter();
    let mut page: Option<&IndexPage> = None;
    for position in offset..end {
        let (page_no, at) = locate(position);
        let current = match page {
            Some(p) if p.page_no == page_no => p,
            _ => {
                let next = supplied.next().ok_or(LockError::IndexPageMismatch)?;
                require!(next.page_no == page_no, LockError::IndexPageMismatch);
                page = Some(next);
                next
            }
        };
        ids.push(*current.ids.get(at).ok_or(LockError::ActiveIndexCorrupt)?);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    const CAP: u64 = INDEX_PAGE_CAPACITY;

    fn code(err: Error) -> u32 {
        match err {
            Error::AnchorError(e) => e.error_code_number,
            Error::ProgramError(_) => u32::MAX,
        }
    }

    fn assert_fails<V>(res: Result<V>, expected: LockError) {
        let err = res.err().expect("operation should fail");
        assert_eq!(code(err), code(expected.into()));
    }

    /// Ledger plus its pages, created on demand the way `create_lock` does.
    #[derive(Default)]
    struct Index {
        ledger: Ledger,
        pages: Vec<IndexPage>,
    }

    impl Index {
        fn with(n: u64) -> Self {
            let mut index = Self::default();
            for expected in 0..n {
                let (id, slot) = index.register().unwrap();
                assert_eq!(id, expected);
                assert_eq!(slot, expected);
            }
            index
        }

        fn register(&mut self) -> Result<(u64, u64)> {
            let tail = self.ledger.tail_page() as usize;
            if tail == self.pages.len() {
                self.pages.push(IndexPage::default());
            }
            self.pages[tail].claim(tail as u64, 0);
            self.ledger.register(&mut self.pages[tail])
        }

        fn remove(&mut self, lock_id: u64, slot: u64) -> Result<Option<u64>> {
            let (page_no, _) = locate(slot);
            let (last_no, _) = locate(self.ledger.active_count.saturating_sub(1));
            let (p, l) = (page_no as usize, last_no as usize);
            if p >= l {
                self.ledger.unregister(lock_id, slot, &mut self.pages[p], None)
            } else {
                let (lo, hi) = self.pages.split_at_mut(l);
                self.ledger
                    .unregister(lock_id, slot, &mut lo[p], Some(&mut hi[0]))
            }
        }

        fn ids(&self) -> Vec<u64> {
            page_ids(self.ledger.active_count, &self.pages, 0, MAX_PAGE_IDS).unwrap()
        }
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut index = Index::with(3);
        assert_eq!(index.remove(2, 2).unwrap(), None);
        assert_eq!(index.remove(0, 0).unwrap(), Some(1));

        let (id, slot) = index.register().unwrap();
        assert_eq!(id, 3);
        assert_eq!(slot, 1);
        assert_eq!(index.ids(), vec![1, 3]);
        assert_eq!(index.ledger.next_lock_id, 4);
    }

    #[test]
    fn swap_remove_within_one_page() {
        let mut index = Index::with(5);
        assert_eq!(index.remove(1, 1).unwrap(), Some(4));
        assert_eq!(index.ids(), vec![0, 4, 2, 3]);
        assert_eq!(index.ledger.active_count, 4);
    }

    #[test]
    fn swap_remove_across_pages() {
        let mut index = Index::with(CAP + 3);
        let last_id = CAP + 2;
        assert_eq!(index.remove(5, 5).unwrap(), Some(last_id));
        assert_eq!(index.pages[0].ids[5], last_id);
        assert_eq!(index.pages[1].ids, vec![CAP, CAP + 1]);
        assert_eq!(index.ledger.active_count, CAP + 2);

        // Draining the tail page leaves it empty and reusable.
        index.remove(CAP + 1, CAP + 1).unwrap();
        index.remove(CAP, CAP).unwrap();
        assert!(index.pages[1].ids.is_empty());
        let (id, slot) = index.register().unwrap();
        assert_eq!((id, slot), (CAP + 3, CAP));
        assert_eq!(index.pages[1].ids, vec![CAP + 3]);
    }

    #[test]
    fn registration_is_unbounded_by_active_count() {
        // One party holding a thousand idle locks does not stop anyone else.
        let mut index = Index::with(1_000);
        for _ in 0..250 {
            index.register().unwrap();
        }
        assert_eq!(index.ledger.active_count, 1_250);
        assert_eq!(index.ledger.next_lock_id, 1_250);
        assert_eq!(index.pages.len(), (1_250 / CAP + 1) as usize);
        assert_eq!(index.pages.last().unwrap().ids.last(), Some(&1_249));
    }

    #[test]
    fn unregister_rejects_wrong_slot() {
        let mut index = Index::with(3);
        assert_fails(index.remove(1, 2), LockError::ActiveIndexCorrupt);
        assert_fails(index.remove(1, 9), LockError::ActiveIndexCorrupt);
        assert_eq!(index.ids(), vec![0, 1, 2]);
        assert_eq!(index.ledger.active_count, 3);
    }

    #[test]
    fn unregister_checks_the_last_page() {
        let mut index = Index::with(CAP + 1);
        let (first, rest) = index.pages.split_at_mut(1);

        assert_fails(
            index.ledger.unregister(0, 0, &mut first[0], None),
            LockError::IndexPageMismatch,
        );
        let mut stray = IndexPage {
            page_no: 7,
            ..Default::default()
        };
        assert_fails(
            index.ledger.unregister(0, 0, &mut first[0], Some(&mut stray)),
            LockError::IndexPageMismatch,
        );
        assert_eq!(index.ledger.active_count, CAP + 1);
        assert_eq!(rest[0].ids, vec![CAP]);

        // Same-page removal must not be handed a second page.
        let mut index = Index::with(3);
        let mut extra = IndexPage::default();
        assert_fails(
            index.ledger.unregister(0, 0, &mut index.pages[0], Some(&mut extra)),
            LockError::IndexPageMismatch,
        );
    }

    #[test]
    fn unlink_repoints_moved_lock() {
        let mut index = Index::with(3);
        let mut last = Lock {
            id: 2,
            slot: 2,
            ..Default::default()
        };
        index
            .ledger
            .unlink(0, 0, &mut index.pages[0], None, Some(&mut last))
            .unwrap();
        assert_eq!(last.slot, 0);
        assert_eq!(index.ids(), vec![2, 1]);

        // Removing the tail needs no moved lock.
        index
            .ledger
            .unlink(1, 1, &mut index.pages[0], None, None)
            .unwrap();
        assert_eq!(index.ids(), vec![2]);
    }

    #[test]
    fn unlink_requires_the_moved_lock() {
        let mut index = Index::with(3);
        assert_fails(
            index.ledger.unlink(0, 0, &mut index.pages[0], None, None),
            LockError::MovedLockMismatch,
        );

        let mut index = Index::with(3);
        let mut wrong = Lock {
            id: 1,
            slot: 1,
            ..Default::default()
        };
        assert_fails(
            index
                .ledger
                .unlink(0, 0, &mut index.pages[0], None, Some(&mut wrong)),
            LockError::MovedLockMismatch,
        );
        assert_eq!(wrong.slot, 1);
    }

    #[test]
    fn retire_unlinks_and_describes_closure() {
        let mut index = Index::with(CAP + 1);
        let creator = Pubkey::new_unique();
        let asset = Pubkey::new_unique();
        let closing = Lock {
            id: 3,
            slot: 3,
            creator,
            asset,
            amount: 900,
            ..Default::default()
        };
        let mut moved = Lock {
            id: CAP,
            slot: CAP,
            ..Default::default()
        };

        let (first, rest) = index.pages.split_at_mut(1);
        let event = index
            .ledger
            .retire(
                &closing,
                &mut first[0],
                Some(&mut rest[0]),
                Some(&mut moved),
                CloseReason::Cancelled,
            )
            .unwrap();

        assert_eq!(event.lock_id, 3);
        assert_eq!(event.creator, creator);
        assert_eq!(event.asset, asset);
        assert_eq!(event.amount, 900);
        assert_eq!(event.reason, CloseReason::Cancelled);
        assert_eq!(moved.slot, 3);
        assert_eq!(first[0].ids[3], CAP);
        assert!(rest[0].ids.is_empty());
        assert_eq!(index.ledger.active_count, CAP);
    }

    #[test]
    fn paging() {
        let index = Index::with(5);
        let count = index.ledger.active_count;
        assert_eq!(page_ids(count, &index.pages, 0, 10).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(page_ids(count, &index.pages, 1, 2).unwrap(), vec![1, 2]);
        assert_eq!(page_ids(count, &index.pages, 3, 10).unwrap(), vec![3, 4]);
        assert!(page_ids(count, &index.pages, 5, 10).unwrap().is_empty());
        assert!(page_ids(count, &index.pages, u64::MAX, 10).unwrap().is_empty());
        assert!(page_ids(count, &index.pages, 0, 0).unwrap().is_empty());
        assert!(page_ids(count, &[], 9, 10).unwrap().is_empty());
    }

    #[test]
    fn paging_spans_pages_and_clamps_limit() {
        let index = Index::with(2 * CAP + 10);
        let count = index.ledger.active_count;

        let ids = page_ids(count, &index.pages, 0, u32::MAX).unwrap();
        assert_eq!(ids.len(), MAX_PAGE_IDS as usize);

        let ids = page_ids(count, &index.pages[1..], 2 * CAP - 8, 12).unwrap();
        let expected: Vec<u64> = (2 * CAP - 8..2 * CAP + 4).collect();
        assert_eq!(ids, expected);

        let ids = page_ids(count, &index.pages[2..], 2 * CAP, 100).unwrap();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn paging_requires_the_covering_pages() {
        let index = Index::with(CAP + 10);
        let count = index.ledger.active_count;
        assert_fails(
            page_ids(count, &index.pages[..1], CAP - 2, 5),
            LockError::IndexPageMismatch,
        );
        assert_fails(
            page_ids(count, &index.pages[1..], 0, 5),
            LockError::IndexPageMismatch,
        );
    }
}
