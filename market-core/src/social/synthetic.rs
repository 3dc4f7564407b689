use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{
    model::{RecentPost, SocialStats},
    weather::synthetic::round_to,
};

pub const HASHTAGS: &[&str] = &[
    "#fashion",
    "#ootd",
    "#style",
    "#newcollection",
    "#trends2025",
    "#limited",
    "#organic",
    "#musthave",
];

pub const CAMPAIGNS: &[&str] = &[
    "Spring Sale 2025",
    "Festive Offers",
    "New Arrivals",
    "Summer Essentials",
    "Influencer Collab",
];

pub fn stats<R: Rng + ?Sized>(handle: &str, rng: &mut R) -> SocialStats {
    let followers: u64 = rng.random_range(500..=20_000);
    let engagement_rate = round_to(rng.random_range(1.2..=10.0), 2);
    let media_count = rng.random_range(50..=350);

    let recent_post = RecentPost {
        likes: rng.random_range(75..=1_200),
        comments: rng.random_range(2..=50),
        reach: rng.random_range(500..=followers * 3),
        hashtags: HASHTAGS
            .choose_multiple(rng, 3)
            .map(|tag| tag.to_string())
            .collect(),
    };

    let latest_campaign = CAMPAIGNS
        .choose(rng)
        .copied()
        .unwrap_or("New Arrivals")
        .to_string();

    SocialStats {
        handle: handle.to_string(),
        followers,
        engagement_rate,
        media_count,
        recent_post,
        latest_campaign,
    }
}
