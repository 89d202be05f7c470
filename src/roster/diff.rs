use std::collections::HashSet;

use crate::session::Participant;

/// One step of an incremental roster refresh.
///
/// Indices refer to the working list as it stands when the edit is applied,
/// so a script replayed in order via [`apply`] transforms the old snapshot
/// into the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEdit {
    Insert { index: usize, participant: Participant },
    Remove { index: usize, id: String },
    Move { from: usize, to: usize },
    Update { index: usize, participant: Participant },
}

/// Compute the edit script turning `old` into `new`, keyed by participant id.
///
/// Participants on the longest common subsequence of the two id orders keep
/// their slots untouched; only the survivors outside it move, so one
/// repositioned participant never drags stable neighbours along. A
/// participant present in both snapshots is never reported as
/// removed-then-reinserted: a position change becomes a `Move`, a field
/// change at a stable position an `Update`. Assumes ids are unique within
/// each snapshot, which the coordinator guarantees.
pub fn diff(old: &[Participant], new: &[Participant]) -> Vec<RosterEdit> {
    let mut edits = Vec::new();
    let new_ids: HashSet<&str> = new.iter().map(|p| p.id.as_str()).collect();
    let mut working: Vec<Participant> = old.to_vec();

    // Drop participants that left, highest index first so earlier indices
    // stay valid.
    for index in (0..working.len()).rev() {
        if !new_ids.contains(working[index].id.as_str()) {
            let removed = working.remove(index);
            edits.push(RosterEdit::Remove {
                index,
                id: removed.id,
            });
        }
    }

    // Survivors on the common subsequence act as fixed anchors.
    let anchors = common_subsequence_ids(&working, new);

    for (index, target) in new.iter().enumerate() {
        // Positions before `index` already match the target order.
        //
        // When the slot of an anchor is occupied by a displaced survivor,
        // park that survivor at the back; it settles at its own turn. The
        // occupant is never an anchor itself: anchors keep their relative
        // order, and every earlier one is already placed.
        while anchors.contains(target.id.as_str())
            && working.get(index).is_some_and(|p| p.id != target.id)
        {
            let blocker = working.remove(index);
            let to = working.len();
            working.insert(to, blocker);
            edits.push(RosterEdit::Move { from: index, to });
        }

        match working.iter().position(|p| p.id == target.id) {
            Some(from) if from == index => {}
            Some(from) => {
                let moved = working.remove(from);
                working.insert(index, moved);
                edits.push(RosterEdit::Move { from, to: index });
            }
            None => {
                working.insert(index, target.clone());
                edits.push(RosterEdit::Insert {
                    index,
                    participant: target.clone(),
                });
            }
        }

        if working[index] != *target {
            working[index] = target.clone();
            edits.push(RosterEdit::Update {
                index,
                participant: target.clone(),
            });
        }
    }

    edits
}

/// Replay an edit script on top of `roster` in order.
pub fn apply(roster: &mut Vec<Participant>, edits: &[RosterEdit]) {
    for edit in edits {
        match edit {
            RosterEdit::Remove { index, .. } => {
                roster.remove(*index);
            }
            RosterEdit::Insert { index, participant } => {
                roster.insert(*index, participant.clone());
            }
            RosterEdit::Move { from, to } => {
                let participant = roster.remove(*from);
                roster.insert(*to, participant);
            }
            RosterEdit::Update { index, participant } => {
                roster[*index] = participant.clone();
            }
        }
    }
}

/// Ids of a longest common subsequence of the two participant orders.
fn common_subsequence_ids(old: &[Participant], new: &[Participant]) -> HashSet<String> {
    let n = old.len();
    let m = new.len();
    let mut lengths = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if old[i].id == new[j].id {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut kept = HashSet::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i].id == new[j].id {
            kept.insert(old[i].id.clone());
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    kept
}
