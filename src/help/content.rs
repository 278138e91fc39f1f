use super::{HelpBook, HelpFlag, HelpTopic, Section};

pub(crate) fn book() -> HelpBook<'static> {
    HelpBook {
        title: "zet_rename: timestamped note renamer",
        usage: "zr [run] [options] | zr help [topic] | zr guide [topic]",
        topics: ALL_TOPICS,
        footer: &[
            "Use `zr help <topic>` for focused docs, e.g. `zr help run` or `zr help naming`.",
        ],
    }
}

const RUN_FLAGS: &[HelpFlag<'static>] = &[
    HelpFlag {
        name: "--root <dir>",
        desc: "Repository root (default $ZET_ROOT, else the current directory).",
    },
    HelpFlag {
        name: "--base-dir <sub>",
        desc: "Only process this subdirectory of the root; renamed notes land there too.",
    },
    HelpFlag {
        name: "--model <name>",
        desc: "Model asked for suggestions (default $ZET_MODEL, else zettel).",
    },
    HelpFlag {
        name: "--host <url>",
        desc: "Suggestion service base URL (default $OLLAMA_HOST, else http://127.0.0.1:11434).",
    },
    HelpFlag {
        name: "--max-slug <n>",
        desc: "Longest slug kept, in characters (default 60).",
    },
    HelpFlag {
        name: "--max-file <n>",
        desc: "Longest basename without .md (default 90, at least 23).",
    },
    HelpFlag {
        name: "--excerpt <n>",
        desc: "Characters of the body sent with each request (default 2500).",
    },
    HelpFlag {
        name: "--timeout <dur>",
        desc: "Deadline per request: 30s, 500ms, 2m or bare seconds (default 30s).",
    },
    HelpFlag {
        name: "--apply",
        desc: "Move and rewrite notes. Without it nothing on disk changes.",
    },
    HelpFlag {
        name: "--only-readme",
        desc: "Only legacy <timestamp>/README.md notes.",
    },
    HelpFlag {
        name: "--readme-any",
        desc: "Include every README.md under the working root.",
    },
    HelpFlag {
        name: "--collection <name>",
        desc: "Review collection whose READMEs are named after their directory (default 0_reviews).",
    },
    HelpFlag {
        name: "--offline",
        desc: "Never call the suggestion service; titles come from the notes themselves.",
    },
    HelpFlag {
        name: "--no-git",
        desc: "Rename with the filesystem instead of `git mv`.",
    },
    HelpFlag {
        name: "--plain",
        desc: "Disable colored output (same as NO_COLOR).",
    },
    HelpFlag {
        name: "-h, --help",
        desc: "Show this help.",
    },
];

const ALL_TOPICS: &[HelpTopic<'static>] = &[
    HelpTopic {
        name: "run",
        summary: "Plan new names for notes and, with --apply, move and rewrite them.",
        usage: "zr [run] [options]",
        details: &[
            "Each selected note gets a 14-digit identity, a suggested title, slug and tags, and a destination `<id>-<slug>.md` in the working root.",
            "Every planned move is printed as `source  ->  destination`, relative to the root. A dry run is the default.",
            "If the suggestion service is down or answers nonsense the note still gets a name from its existing title or first heading.",
        ],
        flags: RUN_FLAGS,
        aliases: &["rename"],
        section: Section::Command,
        examples: &[
            "zr --root ~/zet",
            "zr --root ~/zet --apply",
            "zr --root ~/zet --only-readme --offline",
            "zr --root ~/zet --base-dir 0_reviews --readme-any --only-readme --apply",
        ],
    },
    HelpTopic {
        name: "help",
        summary: "Show this overview or a focused topic.",
        usage: "zr help [topic]",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["zr help run", "zr help frontmatter"],
    },
    HelpTopic {
        name: "guide",
        summary: "List the guides or open one.",
        usage: "zr guide [topic]",
        details: &[],
        flags: &[],
        aliases: &["guides"],
        section: Section::Command,
        examples: &["zr guide naming"],
    },
    HelpTopic {
        name: "ZET_ROOT",
        summary: "Repository root used when --root is not given.",
        usage: "ZET_ROOT",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "ZET_MODEL",
        summary: "Model used when --model is not given.",
        usage: "ZET_MODEL",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "OLLAMA_HOST",
        summary: "Suggestion service address; a bare host:port gets http:// prepended.",
        usage: "OLLAMA_HOST",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "NO_COLOR",
        summary: "Disable colored output.",
        usage: "NO_COLOR",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "RUST_LOG",
        summary: "Log filter; warnings are shown by default, `debug` explains every skip.",
        usage: "RUST_LOG",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "identity",
        summary: "Where a note's 14-digit id comes from.",
        usage: "zr guide identity",
        details: &[
            "1. A legacy folder: `.../20210504185947/README.md` uses the folder name.",
            "2. An `id:` frontmatter value of exactly 14 digits, quotes allowed.",
            "3. A file name starting with 14 digits.",
            "4. The file's modification time, in local time.",
            "Notes with no usable id, or with neither a title nor a body, are skipped.",
        ],
        flags: &[],
        aliases: &["id", "ids"],
        section: Section::Guide,
        examples: &[],
    },
    HelpTopic {
        name: "naming",
        summary: "How destination file names are built.",
        usage: "zr guide naming",
        details: &[
            "Slugs are lowercase ASCII words joined by single hyphens. Anything else collapses into a hyphen.",
            "The slug is cut to --max-slug characters, then the whole basename is cut to --max-file, keeping at least 8 slug characters.",
            "An empty slug becomes `note`. A taken name gets `-2`, `-3`, ... appended; a note that already has its name is left where it is.",
        ],
        flags: &[],
        aliases: &["slug", "slugs"],
        section: Section::Guide,
        examples: &[],
    },
    HelpTopic {
        name: "frontmatter",
        summary: "What happens to the metadata block at the top of a note.",
        usage: "zr guide frontmatter",
        details: &[
            "The block is rebuilt on every run: id, title, date, tags and type first, then every other key in alphabetical order.",
            "A missing id is added. An id that is not 14 digits is kept as written and reported as a warning.",
            "Suggested tags replace the existing list as sorted, deduplicated `#kebab-case` values. With no usable suggestion the existing tags stay untouched.",
        ],
        flags: &[],
        aliases: &["metadata", "tags"],
        section: Section::Guide,
        examples: &[],
    },
    HelpTopic {
        name: "reviews",
        summary: "Book and media reviews named after their folder.",
        usage: "zr guide reviews",
        details: &[
            "With --base-dir set to the review collection and --readme-any, each README.md is named after the directory that holds it and keeps its own title.",
            "Tags still come from the suggestion service.",
        ],
        flags: &[],
        aliases: &["collection", "review"],
        section: Section::Guide,
        examples: &["zr --base-dir 0_reviews --readme-any --only-readme"],
    },
];
