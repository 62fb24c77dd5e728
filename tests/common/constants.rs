#![allow(dead_code)]

pub const ARTIST_1_ID: &str = "A1";
pub const ARTIST_1_NAME: &str = "The First Band";
pub const ARTIST_2_ID: &str = "A2";
pub const ARTIST_2_NAME: &str = "Second Singer";

pub const VIDEO_1_ID: &str = "V1";
pub const VIDEO_1_TITLE: &str = "Song";
pub const VIDEO_2_ID: &str = "V2";
pub const VIDEO_2_TITLE: &str = "Ballad";
pub const VIDEO_3_ID: &str = "V3";
pub const VIDEO_3_TITLE: &str = "Interlude";
/// Video without any artist link.
pub const ORPHAN_VIDEO_ID: &str = "V9";
pub const ORPHAN_VIDEO_TITLE: &str = "Untitled";

pub const VIDEO_1_LYRICS: &str = "la la la";
pub const VIDEO_2_LYRICS: &str = "[Chorus]\nslow words\nslow words";

/// Library export in the streaming service's song shape.
pub const LIBRARY_EXPORT_JSON: &str = r#"[
    {
        "videoId": "V1",
        "title": "Song",
        "artists": [{ "name": "The First Band", "id": "A1" }],
        "album": { "name": "First Album", "id": "AL1" },
        "likeStatus": "LIKE",
        "inLibrary": true,
        "isAvailable": true,
        "isExplicit": false,
        "videoType": "MUSIC_VIDEO_TYPE_ATV",
        "views": "1.2M",
        "duration": "3:35",
        "duration_seconds": 215,
        "thumbnails": [
            { "url": "https://lh3.example/v1=w60-h60", "width": 60, "height": 60 },
            { "url": "https://lh3.example/v1=w120-h120", "width": 120, "height": 120 }
        ],
        "feedbackTokens": { "add": "AB1-add", "remove": "AB1-remove" }
    },
    {
        "videoId": "V2",
        "title": "Ballad",
        "artists": [
            { "name": "Second Singer", "id": "A2" },
            { "name": "Uncredited Choir", "id": null }
        ],
        "album": null,
        "likeStatus": "INDIFFERENT",
        "inLibrary": true,
        "isAvailable": true,
        "isExplicit": true,
        "videoType": "MUSIC_VIDEO_TYPE_OMV",
        "views": "830K",
        "duration": "4:01",
        "thumbnails": [{ "url": "https://lh3.example/v2=w60-h60", "width": 60, "height": 60 }],
        "feedbackTokens": null
    }
]"#;
