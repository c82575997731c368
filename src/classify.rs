use crate::models::{IdeaDraft, IdeaRecord, Tier};

/// Attach a tier to every draft, preserving order.
pub fn classify(drafts: Vec<IdeaDraft>) -> Vec<IdeaRecord> {
    drafts
        .into_iter()
        .map(|d| IdeaRecord {
            tier: Tier::from_total(d.scores.total),
            topic: d.topic,
            product_name: d.product_name,
            core_function: d.core_function,
            target_users: d.target_users,
            timeline: d.timeline,
            scores: d.scores,
        })
        .collect()
}

/// Ideas bucketed by tier: best tier first, input order kept inside a tier, empty tiers absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TierGroups<'a> {
    groups: Vec<(Tier, Vec<&'a IdeaRecord>)>,
}

impl<'a> TierGroups<'a> {
    pub fn group(ideas: &'a [IdeaRecord]) -> Self {
        let groups = Tier::ALL
            .iter()
            .map(|&tier| (tier, ideas.iter().filter(|i| i.tier == tier).collect::<Vec<_>>()))
            .filter(|(_, members)| !members.is_empty())
            .collect();
        Self { groups }
    }

    pub fn get(&self, tier: Tier) -> Option<&[&'a IdeaRecord]> {
        self.groups
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, members)| members.as_slice())
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.get(tier).map_or(0, |m| m.len())
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[&'a IdeaRecord])> + '_ {
        self.groups.iter().map(|(t, m)| (*t, m.as_slice()))
    }
}
