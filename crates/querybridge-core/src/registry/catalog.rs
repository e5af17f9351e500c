//! The provider catalog. Declaration order matters: URL detection returns
//! the first match, so providers sharing a host family must keep their
//! relative order.

use querybridge_client::types::AuthScheme;

use super::ProviderDescriptor;

pub(crate) static PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        key: "twitter",
        name: "Twitter API",
        base_url: "https://api.twitter.com/2",
        auth_type: AuthScheme::Bearer,
        description: "Access Twitter posts, users, and interactions",
        endpoints: &[
            ("tweets", "/tweets"),
            ("users", "/users"),
            ("search", "/tweets/search/recent"),
        ],
        query_patterns: &[
            ("tweets", &["tweet", "post", "status"]),
            ("users", &["user", "profile", "account"]),
            ("search", &["search", "find", "lookup"]),
        ],
        example_queries: &[
            "Get recent tweets",
            "Search for tweets about AI",
            "Get user profile information",
            "Find tweets by username",
        ],
    },
    ProviderDescriptor {
        key: "facebook",
        name: "Facebook Graph API",
        base_url: "https://graph.facebook.com/v18.0",
        auth_type: AuthScheme::ApiKey,
        description: "Access Facebook pages, posts, and insights",
        endpoints: &[
            ("me", "/me"),
            ("pages", "/me/accounts"),
            ("posts", "/{page-id}/posts"),
        ],
        query_patterns: &[
            ("profile", &["profile", "me", "account"]),
            ("pages", &["page", "pages"]),
            ("posts", &["post", "posts", "feed"]),
        ],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "instagram",
        name: "Instagram Basic Display API",
        base_url: "https://graph.instagram.com",
        auth_type: AuthScheme::Bearer,
        description: "Access Instagram user media and profile",
        endpoints: &[("me", "/me"), ("media", "/me/media")],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "linkedin",
        name: "LinkedIn API",
        base_url: "https://api.linkedin.com/v2",
        auth_type: AuthScheme::Bearer,
        description: "Access LinkedIn profiles and company data",
        endpoints: &[("profile", "/people/(id:me)"), ("companies", "/companies")],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "discord",
        name: "Discord API",
        base_url: "https://discord.com/api/v10",
        auth_type: AuthScheme::Bearer,
        description: "Manage Discord servers, channels, and messages",
        endpoints: &[
            ("guilds", "/users/@me/guilds"),
            ("channels", "/guilds/{guild_id}/channels"),
            ("messages", "/channels/{channel_id}/messages"),
        ],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "slack",
        name: "Slack Web API",
        base_url: "https://slack.com/api",
        auth_type: AuthScheme::Bearer,
        description: "Interact with Slack workspaces and channels",
        endpoints: &[
            ("channels", "/conversations.list"),
            ("messages", "/chat.postMessage"),
            ("users", "/users.list"),
        ],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "github",
        name: "GitHub API",
        base_url: "https://api.github.com",
        auth_type: AuthScheme::Bearer,
        description: "Access GitHub repositories, commits, and issues",
        endpoints: &[
            ("repos", "/user/repos"),
            ("commits", "/repos/{owner}/{repo}/commits"),
            ("issues", "/repos/{owner}/{repo}/issues"),
            ("pulls", "/repos/{owner}/{repo}/pulls"),
        ],
        query_patterns: &[
            ("repositories", &["repo", "repository", "repositories"]),
            ("commits", &["commit", "commits", "changes"]),
            ("issues", &["issue", "issues", "bug", "bugs"]),
            ("pulls", &["pull", "pr", "merge", "pull request"]),
        ],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "gitlab",
        name: "GitLab API",
        base_url: "https://gitlab.com/api/v4",
        auth_type: AuthScheme::ApiKey,
        description: "Access GitLab projects and repositories",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "bitbucket",
        name: "Bitbucket API",
        base_url: "https://api.bitbucket.org/2.0",
        auth_type: AuthScheme::Bearer,
        description: "Manage Bitbucket repositories and pipelines",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "jira",
        name: "Jira API",
        base_url: "https://{domain}.atlassian.net/rest/api/3",
        auth_type: AuthScheme::Basic,
        description: "Manage Jira issues and projects",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "shopify",
        name: "Shopify API",
        base_url: "https://{shop}.myshopify.com/admin/api/2023-10",
        auth_type: AuthScheme::ApiKey,
        description: "Manage Shopify stores and products",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "woocommerce",
        name: "WooCommerce API",
        base_url: "https://{domain}/wp-json/wc/v3",
        auth_type: AuthScheme::Basic,
        description: "Manage WooCommerce products and orders",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "stripe",
        name: "Stripe API",
        base_url: "https://api.stripe.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "Handle payments and billing",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "paypal",
        name: "PayPal API",
        base_url: "https://api.paypal.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "Process PayPal payments",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "wordpress",
        name: "WordPress REST API",
        base_url: "https://{domain}/wp-json/wp/v2",
        auth_type: AuthScheme::ApiKey,
        description: "Manage WordPress posts, pages, and media",
        endpoints: &[
            ("posts", "/posts"),
            ("pages", "/pages"),
            ("media", "/media"),
            ("users", "/users"),
            ("comments", "/comments"),
        ],
        query_patterns: &[
            ("posts", &["post", "posts", "blog", "article"]),
            ("pages", &["page", "pages"]),
            ("media", &["media", "image", "file"]),
            ("users", &["user", "users", "author"]),
            ("comments", &["comment", "comments"]),
        ],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "contentful",
        name: "Contentful API",
        base_url: "https://api.contentful.com/spaces/{space_id}",
        auth_type: AuthScheme::Bearer,
        description: "Manage headless CMS content",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "openweather",
        name: "OpenWeatherMap API",
        base_url: "https://api.openweathermap.org/data/2.5",
        auth_type: AuthScheme::ApiKey,
        description: "Get weather data and forecasts",
        endpoints: &[
            ("current", "/weather"),
            ("forecast", "/forecast"),
            ("history", "/onecall/timemachine"),
        ],
        query_patterns: &[
            ("current", &["weather", "current", "now"]),
            ("forecast", &["forecast", "future", "prediction"]),
            ("history", &["history", "past", "historical"]),
        ],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "weatherapi",
        name: "WeatherAPI",
        base_url: "https://api.weatherapi.com/v1",
        auth_type: AuthScheme::ApiKey,
        description: "Weather data and forecasting",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "mapbox",
        name: "Mapbox API",
        base_url: "https://api.mapbox.com",
        auth_type: AuthScheme::ApiKey,
        description: "Maps, geocoding, and navigation",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "google_maps",
        name: "Google Maps API",
        base_url: "https://maps.googleapis.com/maps/api",
        auth_type: AuthScheme::ApiKey,
        description: "Google Maps services",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "coinbase",
        name: "Coinbase API",
        base_url: "https://api.coinbase.com/v2",
        auth_type: AuthScheme::Bearer,
        description: "Cryptocurrency trading and data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "binance",
        name: "Binance API",
        base_url: "https://api.binance.com/api/v3",
        auth_type: AuthScheme::ApiKey,
        description: "Cryptocurrency exchange data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "alpha_vantage",
        name: "Alpha Vantage API",
        base_url: "https://www.alphavantage.co/query",
        auth_type: AuthScheme::ApiKey,
        description: "Stock market data and indicators",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "sendgrid",
        name: "SendGrid API",
        base_url: "https://api.sendgrid.com/v3",
        auth_type: AuthScheme::Bearer,
        description: "Email delivery service",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "mailchimp",
        name: "Mailchimp API",
        base_url: "https://{dc}.api.mailchimp.com/3.0",
        auth_type: AuthScheme::ApiKey,
        description: "Email marketing automation",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "twilio",
        name: "Twilio API",
        base_url: "https://api.twilio.com/2010-04-01",
        auth_type: AuthScheme::Basic,
        description: "SMS and voice communications",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "airtable",
        name: "Airtable API",
        base_url: "https://api.airtable.com/v0",
        auth_type: AuthScheme::Bearer,
        description: "Cloud database platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "notion",
        name: "Notion API",
        base_url: "https://api.notion.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "Workspace and productivity platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "firebase",
        name: "Firebase API",
        base_url: "https://{project}.firebaseio.com",
        auth_type: AuthScheme::Bearer,
        description: "Google Firebase services",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "zoom",
        name: "Zoom API",
        base_url: "https://api.zoom.us/v2",
        auth_type: AuthScheme::Bearer,
        description: "Video conferencing platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "microsoft_graph",
        name: "Microsoft Graph API",
        base_url: "https://graph.microsoft.com/v1.0",
        auth_type: AuthScheme::Bearer,
        description: "Microsoft 365 services",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "trello",
        name: "Trello API",
        base_url: "https://api.trello.com/1",
        auth_type: AuthScheme::ApiKey,
        description: "Project management boards",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "asana",
        name: "Asana API",
        base_url: "https://app.asana.com/api/1.0",
        auth_type: AuthScheme::Bearer,
        description: "Team collaboration and project management",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "spotify",
        name: "Spotify Web API",
        base_url: "https://api.spotify.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "Music streaming platform",
        endpoints: &[
            ("search", "/search"),
            ("tracks", "/tracks"),
            ("artists", "/artists"),
        ],
        query_patterns: &[
            ("search", &["search", "find", "lookup"]),
            ("tracks", &["track", "song", "songs"]),
            ("artists", &["artist", "band", "musician"]),
        ],
        example_queries: &["Search for songs by 'Miles Davis'", "Find track details"],
    },
    ProviderDescriptor {
        key: "youtube",
        name: "YouTube Data API",
        base_url: "https://www.googleapis.com/youtube/v3",
        auth_type: AuthScheme::ApiKey,
        description: "YouTube videos and channels",
        endpoints: &[
            ("search", "/search"),
            ("videos", "/videos"),
            ("channels", "/channels"),
        ],
        query_patterns: &[
            ("search", &["search", "find", "lookup"]),
            ("videos", &["video", "videos", "watch"]),
            ("channels", &["channel", "channels", "creator"]),
        ],
        example_queries: &["Search for videos about 'rust programming'"],
    },
    ProviderDescriptor {
        key: "twitch",
        name: "Twitch API",
        base_url: "https://api.twitch.tv/helix",
        auth_type: AuthScheme::Bearer,
        description: "Live streaming platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "newsapi",
        name: "News API",
        base_url: "https://newsapi.org/v2",
        auth_type: AuthScheme::ApiKey,
        description: "News headlines and articles",
        endpoints: &[
            ("everything", "/everything"),
            ("headlines", "/top-headlines"),
        ],
        query_patterns: &[
            ("everything", &["search", "find", "articles", "news"]),
            ("headlines", &["headline", "headlines", "top", "breaking"]),
        ],
        example_queries: &["Search news about 'climate change'", "Top headlines for country us"],
    },
    ProviderDescriptor {
        key: "reddit",
        name: "Reddit API",
        base_url: "https://oauth.reddit.com",
        auth_type: AuthScheme::Bearer,
        description: "Reddit posts and comments",
        endpoints: &[("listing", "/best"), ("search", "/search")],
        query_patterns: &[
            ("listing", &["post", "posts", "hot", "best", "feed"]),
            ("search", &["search", "find"]),
        ],
        example_queries: &["Show hot posts from subreddit rust"],
    },
    ProviderDescriptor {
        key: "wikipedia",
        name: "Wikipedia API",
        base_url: "https://en.wikipedia.org/api/rest_v1",
        auth_type: AuthScheme::None,
        description: "Wikipedia articles and data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "openai",
        name: "OpenAI API",
        base_url: "https://api.openai.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "AI models and completions",
        endpoints: &[
            ("completions", "/completions"),
            ("chat", "/chat/completions"),
            ("embeddings", "/embeddings"),
            ("images", "/images/generations"),
        ],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "deepseek",
        name: "DeepSeek API",
        base_url: "https://api.deepseek.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "Advanced AI models for coding and reasoning",
        endpoints: &[("chat", "/chat/completions"), ("completions", "/completions")],
        query_patterns: &[
            ("chat", &["chat", "conversation", "ask"]),
            ("code", &["code", "programming", "debug"]),
        ],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "huggingface",
        name: "Hugging Face API",
        base_url: "https://api-inference.huggingface.co",
        auth_type: AuthScheme::Bearer,
        description: "Machine learning models",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "anthropic",
        name: "Anthropic API",
        base_url: "https://api.anthropic.com/v1",
        auth_type: AuthScheme::ApiKey,
        description: "Claude AI assistant",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "cohere",
        name: "Cohere API",
        base_url: "https://api.cohere.ai/v1",
        auth_type: AuthScheme::Bearer,
        description: "Language AI platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "steam",
        name: "Steam Web API",
        base_url: "https://api.steampowered.com",
        auth_type: AuthScheme::ApiKey,
        description: "Steam gaming platform data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "yelp",
        name: "Yelp Fusion API",
        base_url: "https://api.yelp.com/v3",
        auth_type: AuthScheme::Bearer,
        description: "Restaurant and business reviews",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "fitbit",
        name: "Fitbit API",
        base_url: "https://api.fitbit.com/1",
        auth_type: AuthScheme::Bearer,
        description: "Fitness tracking and health data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "strava",
        name: "Strava API",
        base_url: "https://www.strava.com/api/v3",
        auth_type: AuthScheme::Bearer,
        description: "Athletic activity tracking",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "etherscan",
        name: "Etherscan API",
        base_url: "https://api.etherscan.io/api",
        auth_type: AuthScheme::ApiKey,
        description: "Ethereum blockchain explorer",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "coingecko",
        name: "CoinGecko API",
        base_url: "https://api.coingecko.com/api/v3",
        auth_type: AuthScheme::None,
        description: "Cryptocurrency market data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "figma",
        name: "Figma API",
        base_url: "https://api.figma.com/v1",
        auth_type: AuthScheme::Bearer,
        description: "Design collaboration platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "telegram",
        name: "Telegram Bot API",
        base_url: "https://api.telegram.org/bot",
        auth_type: AuthScheme::ApiKey,
        description: "Telegram messaging bot platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "whatsapp",
        name: "WhatsApp Business API",
        base_url: "https://graph.facebook.com/v18.0",
        auth_type: AuthScheme::Bearer,
        description: "WhatsApp business messaging",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "vimeo",
        name: "Vimeo API",
        base_url: "https://api.vimeo.com",
        auth_type: AuthScheme::Bearer,
        description: "Video hosting platform",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "unsplash",
        name: "Unsplash API",
        base_url: "https://api.unsplash.com",
        auth_type: AuthScheme::Bearer,
        description: "Free high-quality photos",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "pexels",
        name: "Pexels API",
        base_url: "https://api.pexels.com/v1",
        auth_type: AuthScheme::ApiKey,
        description: "Free stock photos and videos",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "ipinfo",
        name: "IPinfo API",
        base_url: "https://ipinfo.io",
        auth_type: AuthScheme::Bearer,
        description: "IP address geolocation data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "random_user",
        name: "Random User API",
        base_url: "https://randomuser.me/api",
        auth_type: AuthScheme::None,
        description: "Generate random user data",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
    ProviderDescriptor {
        key: "placeholder",
        name: "JSONPlaceholder API",
        base_url: "https://jsonplaceholder.typicode.com",
        auth_type: AuthScheme::None,
        description: "Fake JSON data for testing",
        endpoints: &[],
        query_patterns: &[],
        example_queries: &[],
    },
];

/// Curated category grouping. Maintained independently of the catalog
/// above; a few utility providers carry no category at all.
pub(crate) static CATEGORIES: &[(&str, &[&str])] = &[
    (
        "AI & Machine Learning",
        &["openai", "deepseek", "huggingface", "anthropic", "cohere"],
    ),
    (
        "Social Media & Communication",
        &[
            "twitter", "facebook", "instagram", "linkedin", "discord", "slack", "telegram",
            "whatsapp",
        ],
    ),
    ("Development & Code", &["github", "gitlab", "bitbucket", "jira"]),
    (
        "E-commerce",
        &["shopify", "woocommerce", "stripe", "paypal"],
    ),
    ("Content Management", &["wordpress", "contentful"]),
    (
        "Weather & Location",
        &["openweather", "weatherapi", "mapbox", "google_maps"],
    ),
    (
        "Finance & Crypto",
        &["coinbase", "binance", "alpha_vantage", "etherscan", "coingecko"],
    ),
    ("Email & Messaging", &["sendgrid", "mailchimp", "twilio"]),
    ("Database & Storage", &["airtable", "notion", "firebase"]),
    (
        "Productivity & Collaboration",
        &["zoom", "microsoft_graph", "trello", "asana"],
    ),
    (
        "Media & Entertainment",
        &["spotify", "youtube", "twitch", "vimeo"],
    ),
    ("News & Information", &["newsapi", "reddit", "wikipedia"]),
    ("Gaming & Entertainment", &["steam"]),
    ("Food & Delivery", &["yelp"]),
    ("Health & Fitness", &["fitbit", "strava"]),
    ("Design & Creative", &["figma"]),
    ("Photography", &["unsplash", "pexels"]),
];
