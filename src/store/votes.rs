use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Like,
    Dislike,
}

/// Flip `user`'s vote on a target holding the two disjoint sets.
///
/// Voting again for the same side withdraws the vote. Voting for the other
/// side moves the user across, so `likes` and `dislikes` never share a name.
pub fn toggle(likes: &mut Vec<String>, dislikes: &mut Vec<String>, user: &str, vote: Vote) {
    let (chosen, opposite) = match vote {
        Vote::Like => (likes, dislikes),
        Vote::Dislike => (dislikes, likes),
    };

    if chosen.iter().any(|u| u == user) {
        chosen.retain(|u| u != user);
    } else {
        chosen.push(user.to_string());
        opposite.retain(|u| u != user);
    }
}
