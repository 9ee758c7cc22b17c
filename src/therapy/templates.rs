use rand::seq::SliceRandom;

/// Session-opening lines, in the voice of a therapist who has already
/// given up.
pub const OPENERS: [&str; 5] = [
    "Interesting. Let's unpack that... or maybe let's not.",
    "I'm hearing a lot of projection here. Not the good kind.",
    "How does that make you feel? Wait, don't tell me, I can guess.",
    "That's... certainly a choice you've made.",
    "Let's explore this deeper... actually, maybe let's not go there.",
];

pub const ENDINGS: [&str; 5] = [
    "But hey, at least you're consistent.",
    "Just a thought from your clearly superior inner self.",
    "This has been another session of 'stating the obvious'.",
    "Progress! ...is something we'll work on eventually.",
    "Remember: I'm you, so this is really self-criticism.",
];

pub const WISDOM: [&str; 5] = [
    "Maybe the real therapy was the friends we annoyed along the way.",
    "Have you tried... not being like this?",
    "Your problems are valid. Solving them, however...",
    "It's not you, it's... actually, no, it's definitely you.",
    "I prescribe one serving of 'getting over it' with a side of perspective.",
];

/// One topic branch: trigger keywords plus the line composer for it.
pub struct Branch {
    pub keywords: &'static [&'static str],
    compose: fn() -> String,
}

/// Evaluated top to bottom, first keyword hit wins. The empty-keyword
/// fallback sits last so every message lands somewhere.
pub const BRANCHES: [Branch; 5] = [
    Branch {
        keywords: &["sad", "depressed", "down"],
        compose: compose_sad,
    },
    Branch {
        keywords: &["work", "job", "boss"],
        compose: compose_work,
    },
    Branch {
        keywords: &["relationship", "dating", "love"],
        compose: compose_relationship,
    },
    Branch {
        keywords: &["anxiety", "worried", "stress"],
        compose: compose_anxiety,
    },
    Branch {
        keywords: &[],
        compose: compose_fallback,
    },
];

/// Index into `BRANCHES` for a message; matching is case-insensitive.
pub fn branch_for(message: &str) -> usize {
    let lowered = message.to_lowercase();
    BRANCHES
        .iter()
        .position(|b| b.keywords.iter().any(|k| lowered.contains(k)))
        .unwrap_or(BRANCHES.len() - 1)
}

/// Compose a reply. Branch choice is deterministic on the input; only
/// the pool line draw is random.
pub fn compose(message: &str) -> String {
    (BRANCHES[branch_for(message)].compose)()
}

fn pick(pool: &[&'static str]) -> &'static str {
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or("")
}

fn compose_sad() -> String {
    format!(
        "{} Feeling sad? Revolutionary. Have you tried... not doing that? {}",
        pick(&OPENERS),
        pick(&ENDINGS)
    )
}

fn compose_work() -> String {
    format!(
        "Work problems? Shocking. Maybe if you spent less time complaining and more time... working? {}",
        pick(&ENDINGS)
    )
}

fn compose_relationship() -> String {
    format!(
        "Relationship issues? With that attitude? I'm stunned. {}",
        pick(&WISDOM)
    )
}

fn compose_anxiety() -> String {
    format!(
        "Anxiety, you say? Have you tried just... calming down? Revolutionary concept, I know. {}",
        pick(&ENDINGS)
    )
}

fn compose_fallback() -> String {
    format!("{} {} {}", pick(&OPENERS), pick(&WISDOM), pick(&ENDINGS))
}
