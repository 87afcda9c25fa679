// ABOUTME: Test helper utilities for mocking provider responses and servers
// ABOUTME: Provides mockito-based helpers for unit testing HTTP interactions

#[cfg(test)]
use mockito::{Server, ServerGuard};
#[cfg(test)]
use serde_json::json;

#[cfg(test)]
pub async fn mock_server() -> ServerGuard {
    Server::new_async().await
}

#[cfg(test)]
pub fn tenor_search_response() -> serde_json::Value {
    json!({
        "results": [
            {
                "id": "a",
                "title": "Happy Cat",
                "content_description": "cat smiling",
                "tags": ["cat", "happy"],
                "media_formats": {
                    "gif": {
                        "url": "https://media.tenor.com/a/full.gif",
                        "dims": [498, 280]
                    },
                    "tinygif": {
                        "url": "https://media.tenor.com/a/tiny.gif",
                        "dims": [220, 124]
                    }
                }
            },
            {
                "id": "b",
                "title": "",
                "content_description": "dog waving",
                "media_formats": {
                    "gif": {
                        "url": "https://media.tenor.com/b/full.gif",
                        "dims": [320, 320]
                    }
                }
            },
            {
                "id": "c",
                "title": "no renditions",
                "media_formats": {}
            }
        ],
        "next": "10"
    })
}

#[cfg(test)]
pub fn giphy_search_response() -> serde_json::Value {
    json!({
        "data": [
            {
                "id": "g1",
                "title": "Happy Cat GIF",
                "slug": "happy-cat-g1",
                "images": {
                    "original": {
                        "url": "https://media.giphy.com/media/g1/giphy.gif",
                        "width": "480",
                        "height": "270"
                    },
                    "fixed_width_small": {
                        "url": "https://media.giphy.com/media/g1/100w.gif",
                        "width": "100",
                        "height": "56"
                    }
                }
            },
            {
                "id": "g2",
                "title": " ",
                "slug": "dog-wave-g2",
                "images": {
                    "original": {
                        "url": "https://media.giphy.com/media/g2/giphy.gif"
                    },
                    "fixed_width_small": { "url": "" },
                    "preview_gif": {
                        "url": "https://media.giphy.com/media/g2/preview.gif"
                    }
                }
            },
            {
                "id": "g3",
                "title": "no original",
                "images": {}
            }
        ],
        "pagination": { "total_count": 3, "count": 3, "offset": 0 },
        "meta": { "status": 200, "msg": "OK" }
    })
}
