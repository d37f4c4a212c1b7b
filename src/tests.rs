use crate::{FALLBACK_REPLY, Script, Session, Strategy};

fn doctor() -> Session<'static> {
    Session::new(Script::doctor())
}

#[test]
fn doctor_conversation_examples() {
    // Array of (input, expected reply), each against a fresh session.
    let cases: Vec<(&str, &str)> = vec![
        ("I am sad", "I am sorry to hear that you are sad."),
        ("i am unhappy today", "I am sorry to hear that you are unhappy."),
        ("I'm glad", "How have I helped you to be glad ?"),
        ("I remember my dog", "Do you often think of your dog ?"),
        ("do you remember the summer", "Did you think I would forget the summer ?"),
        ("I hate computers", "Do computers worry you ?"),
        ("machine", "Do computers worry you ?"),
        ("apologise", "Please don't apologise."),
        ("everybody hates me", "Realy, everybody ?"),
        ("I want a holiday", "What would it mean to you if you got a holiday ?"),
        ("I can't sleep", "How do you think that you can't sleep ?"),
        ("you are rude", "What makes you think I am rude ?"),
        ("perhaps", "You don't seem quite certain."),
        ("maybe", "You don't seem quite certain."),
        ("what is my name", "I am not interested in names."),
        ("why don't you help me", "Do you believe I don't help you ?"),
        ("why", "Why do you ask ?"),
        ("you remind me of my father", "In what way ?"),
        ("12345", "I'm not sure I understand you fully."),
        ("", "I'm not sure I understand you fully."),
        ("?!.,", "I'm not sure I understand you fully."),
    ];

    for (input, expected) in cases {
        assert_eq!(doctor().transform(input), expected, "input: {input:?}");
    }
}

#[test]
fn round_robin_cycles_through_every_template() {
    let mut session = doctor();
    let replies: Vec<String> = (0..5).map(|_| session.transform("I am sad")).collect();

    assert_eq!(
        replies,
        vec![
            "I am sorry to hear that you are sad.",
            "Do you think that coming here will help you not to be sad ?",
            "I'm sure it's not pleasant to be sad.",
            "Can you explain what made you sad ?",
            "I am sorry to hear that you are sad.",
        ]
    );
}

#[test]
fn default_key_cycles_when_nothing_matches() {
    let mut session = doctor();
    let replies: Vec<String> = (0..5).map(|_| session.transform("0123456789")).collect();

    assert_eq!(
        replies,
        vec![
            "I'm not sure I understand you fully.",
            "Please go on.",
            "What does that suggest to you ?",
            "Do you feel strongly about discussing such things ?",
            "I'm not sure I understand you fully.",
        ]
    );
}

#[test]
fn memory_is_fifo_and_used_once() {
    let mut session = doctor();

    assert_eq!(session.transform("my car is red. hello"), "How do you do.  Please state your problem.");
    assert_eq!(session.transform("my dog is old. hello"), "Hi.  What seems to be your problem ?");
    assert_eq!(session.memory_len(), 2);

    assert_eq!(session.transform("12345"), "Lets discuss further why your car is red.");
    assert_eq!(session.transform("12345"), "Earlier you said your dog is old.");
    assert_eq!(session.transform("12345"), "I'm not sure I understand you fully.");
}

#[test]
fn memorable_reply_is_used_at_once_when_nothing_else_answers() {
    let mut session = doctor();
    let result = session.transform_verbose("my mother is nice");

    assert_eq!(result.reply, "Lets discuss further why your mother is nice.");
    assert_eq!(result.details.strategy, Strategy::Memory);
    assert_eq!(session.memory_len(), 0);
}

#[test]
fn goto_in_rotation_reaches_target_keyword() {
    let mut session = doctor();
    let replies: Vec<String> = (0..4).map(|_| session.transform("can you help")).collect();

    assert_eq!(replies[0], "You believe I can help don't you ?");
    assert_eq!(replies[1], "Why do you ask ?");
    assert_eq!(replies[2], "You want me to be able to help.");
    assert_eq!(replies[3], "Perhaps you would like to be able to help yourself.");
}

#[test]
fn higher_rank_keyword_wins_regardless_of_position() {
    let mut session = doctor();
    // "remember" (5) outranks "my" (2) and "i" (1).
    assert_eq!(session.transform("my friend said i remember him"), "Do you often think of him ?");
}

#[test]
fn post_substitution_flips_perspective() {
    let mut session = doctor();
    assert_eq!(session.transform("I remember you told me about myself"), "Do you often think of I told you about yourself ?");
}

#[test]
fn transform_is_total() {
    let mut session = doctor();
    let inputs = ["", " ", ".", "!!!", "???", "a", "ümlaut ünïcödé", "(1) (2) $ @ *", "goto what", "xnone"];

    for _ in 0..3 {
        for input in inputs {
            let reply = session.transform(input);
            assert!(!reply.is_empty(), "empty reply for {input:?}");
        }
    }
}

#[test]
fn script_without_default_key_falls_back() {
    let script = script! {
        "key: hello",
        "  decomp: *",
        "    reasmb: Hi.",
    };
    let mut session = Session::new(&script);

    assert_eq!(session.transform("12345"), FALLBACK_REPLY);
    assert_eq!(session.transform("hello"), "Hi.");
}

#[test]
fn synonym_reference_in_custom_script() {
    let script = script! {
        "synon: family mother mom father dad",
        "key: my",
        "  decomp: * @family *",
        "    reasmb: Tell me more about your (2).",
    };
    let mut session = Session::new(&script);

    assert_eq!(session.transform("my mother is nice"), "Tell me more about your mother.");
    assert_eq!(session.transform("my dad is nice"), "Tell me more about your dad.");
    assert_eq!(session.transform("my cat is nice"), FALLBACK_REPLY);
}
