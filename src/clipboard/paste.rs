use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::clipboard::store::{CopiedDay, WeekOffset};
use crate::model::slot::{Slot, SlotIdGenerator, SlotMap};

/// Clones every slot of a copied day onto `target`.
///
/// Each clone gets a fresh id from `ids`; type, categories, intervals and
/// notes are kept as they are. Slots already on `target` are not consulted.
pub fn resolve_day<G>(slots: &SlotMap, target: NaiveDate, ids: &mut G) -> SlotMap
where
    G: SlotIdGenerator + ?Sized,
{
    slots
        .values()
        .map(|slot| {
            let pasted = Slot::new(ids.next_id(), slot.params.on_date(target));
            (pasted.id.clone(), pasted)
        })
        .collect()
}

/// Pastes each copied weekday at the same offset from `target_start`.
pub fn resolve_week<G>(
    days: &BTreeMap<WeekOffset, CopiedDay>,
    target_start: NaiveDate,
    ids: &mut G,
) -> BTreeMap<NaiveDate, SlotMap>
where
    G: SlotIdGenerator + ?Sized,
{
    days.iter()
        .map(|(offset, day)| {
            let target = offset.date_from(target_start);
            (target, resolve_day(&day.slots, target, &mut *ids))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::slot::test_support::{SequentialIds, date, slot};
    use crate::model::slot::SlotId;

    #[test]
    fn pasted_day_moves_date_and_renews_ids() {
        let source: SlotMap = [slot("s1", "2021-08-11", &["09:00-10:00"])]
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        let pasted = resolve_day(&source, date("2021-08-18"), &mut SequentialIds::new("p"));

        assert_eq!(pasted.len(), 1);
        let slot = &pasted[&SlotId::from("p-1")];
        assert_ne!(slot.id, SlotId::from("s1"));
        assert_eq!(slot.date(), date("2021-08-18"));
        let original = &source[&SlotId::from("s1")];
        assert_eq!(slot.params.intervals, original.params.intervals);
        assert_eq!(slot.params.categories, original.params.categories);
        assert_eq!(slot.params.slot_type, original.params.slot_type);
        assert_eq!(slot.params.notes, original.params.notes);
    }

    #[test]
    fn pasting_twice_yields_distinct_ids() {
        let source: SlotMap = [
            slot("a", "2021-08-11", &["09:00-10:00"]),
            slot("b", "2021-08-11", &["10:00-11:00"]),
        ]
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();
        let mut ids = SequentialIds::new("p");

        let first = resolve_day(&source, date("2021-08-12"), &mut ids);
        let second = resolve_day(&source, date("2021-08-12"), &mut ids);

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert!(first.keys().all(|id| !second.contains_key(id)));
    }

    #[test]
    fn week_keeps_weekday_offsets() {
        let copied_start = date("2021-08-09");
        let days: BTreeMap<WeekOffset, CopiedDay> = [(0u8, "2021-08-09"), (3, "2021-08-12")]
            .into_iter()
            .map(|(offset, day)| {
                let offset = WeekOffset::new(offset).unwrap();
                let slot = slot(&format!("s{}", offset), day, &["09:00-10:00"]);
                let copied = CopiedDay {
                    date: offset.date_from(copied_start),
                    slots: SlotMap::from([(slot.id.clone(), slot)]),
                };
                (offset, copied)
            })
            .collect();

        let target_start = date("2021-09-06");
        let pasted = resolve_week(&days, target_start, &mut SequentialIds::new("w"));

        assert_eq!(
            pasted.keys().copied().collect::<Vec<_>>(),
            vec![date("2021-09-06"), date("2021-09-09")]
        );
        for (offset, copied) in &days {
            let source = copied.slots.values().next().unwrap();
            let pasted_day = &pasted[&offset.date_from(target_start)];
            let slot = pasted_day.values().next().unwrap();
            assert_eq!(
                (slot.date() - target_start).num_days(),
                (source.date() - copied_start).num_days()
            );
        }
    }
}
