use crate::models::ContributionDay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub current: u32,
    pub max: u32,
}

/// Walks the days newest first, counting runs of active days.
///
/// `max` is the longest run. `current` takes the running count only on the
/// newest day or when the next-newer day was also active, so it ends up as
/// the count at the last such position reached. This is not the same as the
/// length of the most recent run: a run of two or more days further back in
/// the year overwrites the value set by a lone active day at the end.
pub fn compute_streaks(chronological: &[&ContributionDay]) -> Streaks {
    let newest_first: Vec<&ContributionDay> = chronological.iter().rev().copied().collect();

    let mut streaks = Streaks::default();
    let mut running = 0u32;

    for (index, day) in newest_first.iter().enumerate() {
        if day.contribution_count > 0 {
            running += 1;
            streaks.max = streaks.max.max(running);
            if index == 0 || newest_first[index - 1].contribution_count > 0 {
                streaks.current = running;
            }
        } else {
            running = 0;
        }
    }

    streaks
}
