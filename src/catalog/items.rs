//! Built-in activity content. Three modules: M1 instructions, M2 numbers
//! and logic, M3 focus and routine.

use super::{
    ActivityAccessibility, ActivityItem, ActivityOption, ActivityType, Difficulty,
};

fn opt(id: &str, label: &str, is_correct: bool, tts: &str) -> ActivityOption {
    ActivityOption {
        id: id.to_string(),
        label: label.to_string(),
        is_correct,
        tts_text: Some(tts.to_string()),
        image_url: None,
        image_alt: None,
        tags: None,
    }
}

fn opt_image(
    id: &str,
    label: &str,
    is_correct: bool,
    tts: &str,
    image_url: &str,
    image_alt: &str,
    tags: &[&str],
) -> ActivityOption {
    ActivityOption {
        id: id.to_string(),
        label: label.to_string(),
        is_correct,
        tts_text: Some(tts.to_string()),
        image_url: Some(image_url.to_string()),
        image_alt: Some(image_alt.to_string()),
        tags: if tags.is_empty() {
            None
        } else {
            Some(tags.iter().map(|t| t.to_string()).collect())
        },
    }
}

fn tagged_opt(id: &str, label: &str, is_correct: bool, tts: &str, tags: &[&str]) -> ActivityOption {
    let mut option = opt(id, label, is_correct, tts);
    option.tags = Some(tags.iter().map(|t| t.to_string()).collect());
    option
}

fn access(recommended: &[&str], tts_on_hover: bool, progress_bar: bool) -> ActivityAccessibility {
    ActivityAccessibility {
        recommended_for: recommended.iter().map(|s| s.to_string()).collect(),
        enable_tts_on_hover: tts_on_hover,
        show_progress_bar: progress_bar,
        avoid_metaphors: true,
        consistent_feedback: true,
    }
}

struct ItemSpec {
    id: &'static str,
    module_id: &'static str,
    lesson_id: &'static str,
    activity_type: ActivityType,
    instruction: &'static str,
    difficulty: Difficulty,
}

fn base(
    spec: ItemSpec,
    options: Vec<ActivityOption>,
    accessibility: ActivityAccessibility,
) -> ActivityItem {
    ActivityItem {
        id: spec.id.to_string(),
        module_id: spec.module_id.to_string(),
        lesson_id: spec.lesson_id.to_string(),
        activity_type: spec.activity_type,
        instruction: spec.instruction.to_string(),
        instruction_tts: Some(spec.instruction.to_string()),
        stimulus_image_url: None,
        stimulus_image_alt: None,
        stimulus_emoji: None,
        stimulus_description: None,
        steps: None,
        options,
        difficulty: spec.difficulty,
        max_time_seconds: None,
        target_category: None,
        accessibility,
    }
}

pub(super) fn builtin_activities() -> Vec<ActivityItem> {
    let mut items = Vec::new();

    // Module 1, Lesson 1.1 — match picture to word
    let mut pig = base(
        ItemSpec {
            id: "M1_L1_Q1",
            module_id: "M1",
            lesson_id: "1.1",
            activity_type: ActivityType::ImageToWord,
            instruction: "Match the picture to the correct word.",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "Pig", true, "pig"),
            opt("B", "Big", false, "big"),
            opt("C", "Dig", false, "dig"),
        ],
        access(&["Dyslexia"], true, false),
    );
    pig.instruction_tts = Some("Look at the picture and click the word that matches.".to_string());
    pig.stimulus_image_url = Some("/images/module1/lesson1/pig.png".to_string());
    pig.stimulus_image_alt = Some("A pink pig standing on grass".to_string());
    pig.stimulus_description = Some("A pink pig".to_string());
    items.push(pig);

    let mut cat = base(
        ItemSpec {
            id: "M1_L1_Q2",
            module_id: "M1",
            lesson_id: "1.1",
            activity_type: ActivityType::ImageToWord,
            instruction: "Match the picture to the correct word.",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "Hat", false, "hat"),
            opt("B", "Cat", true, "cat"),
            opt("C", "Bat", false, "bat"),
        ],
        access(&["Dyslexia"], true, false),
    );
    cat.stimulus_image_url = Some("/images/module1/lesson1/cat.png".to_string());
    cat.stimulus_image_alt = Some("An orange cat sitting down".to_string());
    cat.stimulus_description = Some("An orange cat".to_string());
    items.push(cat);

    let mut sun = base(
        ItemSpec {
            id: "M1_L1_Q3",
            module_id: "M1",
            lesson_id: "1.1",
            activity_type: ActivityType::ImageToWord,
            instruction: "Match the picture to the correct word.",
            difficulty: Difficulty::Medium,
        },
        vec![
            opt("A", "Sun", true, "sun"),
            opt("B", "Son", false, "son"),
            opt("C", "Fun", false, "fun"),
            opt("D", "Run", false, "run"),
        ],
        access(&["Dyslexia"], true, false),
    );
    sun.stimulus_emoji = Some("\u{2600}\u{fe0f}".to_string());
    sun.stimulus_description = Some("A bright yellow sun".to_string());
    items.push(sun);

    // Module 1, Lesson 1.2 — one-step instructions
    items.push(base(
        ItemSpec {
            id: "M1_L2_Q1",
            module_id: "M1",
            lesson_id: "1.2",
            activity_type: ActivityType::OneStepInstruction,
            instruction: "Click the sad boy.",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt_image(
                "A",
                "Happy Boy",
                false,
                "happy boy",
                "/images/module1/lesson2/happy_boy.png",
                "A boy smiling happily",
                &["emotion:happy"],
            ),
            opt_image(
                "B",
                "Sad Boy",
                true,
                "sad boy",
                "/images/module1/lesson2/sad_boy.png",
                "A boy with a sad face and tears",
                &["emotion:sad", "target"],
            ),
            opt_image(
                "C",
                "Excited Boy",
                false,
                "excited boy",
                "/images/module1/lesson2/excited_boy.png",
                "A boy jumping with excitement",
                &["emotion:excited"],
            ),
        ],
        access(&["Dyslexia", "ASD"], true, false),
    ));

    items.push(base(
        ItemSpec {
            id: "M1_L2_Q2",
            module_id: "M1",
            lesson_id: "1.2",
            activity_type: ActivityType::OneStepInstruction,
            instruction: "Click the red apple.",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "\u{1f34e}", true, "red apple"),
            opt("B", "\u{1f34c}", false, "banana"),
            opt("C", "\u{1f347}", false, "grapes"),
        ],
        access(&["Dyslexia", "ASD"], true, false),
    ));

    // Module 1, Lesson 1.3 — two-step sequences
    let mut wash = base(
        ItemSpec {
            id: "M1_L3_Q1",
            module_id: "M1",
            lesson_id: "1.3",
            activity_type: ActivityType::TwoStepSequence,
            instruction: "Do the steps in order. What comes second?",
            difficulty: Difficulty::Medium,
        },
        vec![
            opt("A", "Dry your hands", true, "dry your hands"),
            opt("B", "Wash your hands", false, "wash your hands"),
            opt("C", "Eat a snack", false, "eat a snack"),
        ],
        access(&["ASD"], true, false),
    );
    wash.steps = Some(vec![
        "Wash your hands".to_string(),
        "Dry your hands".to_string(),
    ]);
    items.push(wash);

    // Module 2, Lesson 2.1 — counting
    let mut butterfly = base(
        ItemSpec {
            id: "M2_L1_Q1",
            module_id: "M2",
            lesson_id: "2.1",
            activity_type: ActivityType::Counting,
            instruction: "How many butterflies do you see?",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("1", "1", true, "one"),
            opt("2", "2", false, "two"),
            opt("0", "0", false, "zero"),
        ],
        access(&["Dyslexia", "ADHD"], true, false),
    );
    butterfly.stimulus_emoji = Some("\u{1f98b}".to_string());
    butterfly.stimulus_description = Some("one butterfly".to_string());
    items.push(butterfly);

    let mut stars = base(
        ItemSpec {
            id: "M2_L1_Q2",
            module_id: "M2",
            lesson_id: "2.1",
            activity_type: ActivityType::Counting,
            instruction: "How many stars do you see?",
            difficulty: Difficulty::Medium,
        },
        vec![
            opt("A", "3", false, "three"),
            opt("B", "4", true, "four"),
            opt("C", "5", false, "five"),
        ],
        access(&["Dyslexia", "ADHD"], true, false),
    );
    stars.stimulus_emoji = Some("\u{2b50}\u{2b50}\u{2b50}\u{2b50}".to_string());
    stars.stimulus_description = Some("four stars".to_string());
    items.push(stars);

    let mut compare = base(
        ItemSpec {
            id: "M2_L1_Q3",
            module_id: "M2",
            lesson_id: "2.1",
            activity_type: ActivityType::Comparison,
            instruction: "Which group has more?",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "\u{1f436}\u{1f436}\u{1f436}", true, "three dogs"),
            opt("B", "\u{1f431}\u{1f431}", false, "two cats"),
        ],
        access(&["Dyslexia"], true, false),
    );
    compare.stimulus_description = Some("Compare the two groups of animals.".to_string());
    items.push(compare);

    // Module 2, Lesson 2.2 — visual addition
    let mut dogs = base(
        ItemSpec {
            id: "M2_L2_Q1",
            module_id: "M2",
            lesson_id: "2.2",
            activity_type: ActivityType::VisualAddition,
            instruction: "Count and add the pictures. Click the correct answer.",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "2", true, "two"),
            opt("B", "1", false, "one"),
            opt("C", "3", false, "three"),
        ],
        access(&["Dyslexia"], true, false),
    );
    dogs.stimulus_description = Some("\u{1f436} + \u{1f436}".to_string());
    items.push(dogs);

    let mut apples = base(
        ItemSpec {
            id: "M2_L2_Q2",
            module_id: "M2",
            lesson_id: "2.2",
            activity_type: ActivityType::VisualAddition,
            instruction: "Count and add the pictures. Click the correct answer.",
            difficulty: Difficulty::Hard,
        },
        vec![
            opt("A", "4", true, "four"),
            opt("B", "3", false, "three"),
            opt("C", "5", false, "five"),
        ],
        access(&["Dyslexia"], true, false),
    );
    apples.stimulus_description = Some("\u{1f34e}\u{1f34e} + \u{1f34e}\u{1f34e}".to_string());
    items.push(apples);

    // Module 2, Lesson 2.3 — patterns
    let mut circles = base(
        ItemSpec {
            id: "M2_L3_Q1",
            module_id: "M2",
            lesson_id: "2.3",
            activity_type: ActivityType::Pattern,
            instruction: "Look at the pattern and choose what comes next.",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "\u{1f7e2}", false, "green circle"),
            opt("B", "\u{1f534}", true, "red circle"),
            opt("C", "\u{26aa}", false, "white circle"),
        ],
        access(&["Dyslexia"], true, false),
    );
    circles.stimulus_description =
        Some("\u{1f7e2}\u{1f7e2}\u{1f534}\u{1f7e2}\u{1f7e2} \u{2192} ?".to_string());
    items.push(circles);

    let mut triangles = base(
        ItemSpec {
            id: "M2_L3_Q2",
            module_id: "M2",
            lesson_id: "2.3",
            activity_type: ActivityType::Pattern,
            instruction: "Look at the pattern and choose what comes next.",
            difficulty: Difficulty::Medium,
        },
        vec![
            opt("A", "\u{1f53c}", true, "up triangle"),
            opt("B", "\u{1f53d}", false, "down triangle"),
            opt("C", "\u{2b05}\u{fe0f}", false, "left arrow"),
        ],
        access(&["Dyslexia"], true, false),
    );
    triangles.stimulus_description =
        Some("\u{1f53c}\u{1f53d}\u{1f53c}\u{1f53d} \u{2192} ?".to_string());
    items.push(triangles);

    // Module 3, Lesson 3.1 — routines and logic
    let mut routine = base(
        ItemSpec {
            id: "M3_L1_Q1",
            module_id: "M3",
            lesson_id: "3.1",
            activity_type: ActivityType::SequenceOrdering,
            instruction: "Put the morning routine in order. What comes first?",
            difficulty: Difficulty::Easy,
        },
        vec![
            opt("A", "Wake up", true, "wake up"),
            opt("B", "Eat breakfast", false, "eat breakfast"),
            opt("C", "Go to school", false, "go to school"),
        ],
        access(&["ASD", "ADHD"], true, false),
    );
    routine.steps = Some(vec![
        "Wake up".to_string(),
        "Eat breakfast".to_string(),
        "Go to school".to_string(),
    ]);
    items.push(routine);

    items.push(base(
        ItemSpec {
            id: "M3_L1_Q2",
            module_id: "M3",
            lesson_id: "3.1",
            activity_type: ActivityType::LogicChoice,
            instruction: "It is raining. What do you take with you?",
            difficulty: Difficulty::Medium,
        },
        vec![
            opt("A", "Umbrella", true, "umbrella"),
            opt("B", "Sunglasses", false, "sunglasses"),
            opt("C", "Ice cream", false, "ice cream"),
        ],
        access(&["ASD"], true, false),
    ));

    // Module 3, Lesson 3.2 — timed focus filter
    let mut focus = base(
        ItemSpec {
            id: "M3_L2_Q1",
            module_id: "M3",
            lesson_id: "3.2",
            activity_type: ActivityType::FocusFilter,
            instruction: "You have 30 seconds. Only click green things.",
            difficulty: Difficulty::Medium,
        },
        vec![
            tagged_opt("green_leaf", "\u{1f33f}", true, "green leaf", &["green", "target"]),
            tagged_opt("green_ball", "\u{1f7e2}", true, "green circle", &["green", "target"]),
            tagged_opt("red_ball", "\u{1f534}", false, "red circle", &["red", "distractor"]),
            tagged_opt("blue_ball", "\u{1f535}", false, "blue circle", &["blue", "distractor"]),
        ],
        access(&["ADHD"], false, true),
    );
    focus.instruction_tts = Some("You have thirty seconds. Only click green things.".to_string());
    focus.target_category = Some("Green Things".to_string());
    focus.max_time_seconds = Some(30);
    items.push(focus);

    items
}
