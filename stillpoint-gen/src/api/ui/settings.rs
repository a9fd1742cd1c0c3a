//! Settings page handler - API key configuration

use axum::response::{Html, IntoResponse};

/// GET /settings
pub async fn settings_page() -> impl IntoResponse {
    Html(SETTINGS_PAGE_HTML)
}

const SETTINGS_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Stillpoint - Settings</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
        }
        h1 {
            font-size: 26px;
            color: #4a9eff;
        }
        .container {
            max-width: 560px;
            margin: 0 auto;
            padding: 0 20px 40px;
        }
        label {
            display: block;
            margin: 18px 0 6px;
            color: #aaa;
        }
        .current {
            font-family: 'Courier New', monospace;
            color: #666;
            font-size: 13px;
        }
        input {
            width: 100%;
            padding: 10px;
            background: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 6px;
            color: #e0e0e0;
        }
        button {
            margin-top: 12px;
            padding: 10px 18px;
            background: #4a9eff;
            border: none;
            border-radius: 6px;
            color: #fff;
            cursor: pointer;
        }
        .message {
            margin-top: 10px;
            font-size: 14px;
        }
        a {
            color: #4a9eff;
        }
    </style>
</head>
<body>
    <header>
        <h1>Stillpoint settings</h1>
    </header>
    <div class="container">
        <p>Keys are stored in the service database and backed up to the TOML config.</p>

        <label for="gemini_api_key">Generative-text API key <span class="current" id="gemini-current"></span></label>
        <input id="gemini_api_key" type="password" placeholder="Gemini API key">
        <button data-setting="gemini_api_key" data-input="gemini_api_key">Save</button>
        <div class="message" id="gemini_api_key-message"></div>

        <label for="tts_api_key">Speech-synthesis API key <span class="current" id="tts-current"></span></label>
        <input id="tts_api_key" type="password" placeholder="Text-to-speech API key">
        <button data-setting="tts_api_key" data-input="tts_api_key">Save</button>
        <div class="message" id="tts_api_key-message"></div>

        <p style="margin-top: 30px;"><a href="/">Back to the request form</a></p>
    </div>
    <script>
        async function loadCurrent() {
            const response = await fetch('/api/settings');
            if (!response.ok) return;
            const settings = await response.json();
            document.getElementById('gemini-current').textContent =
                settings.gemini_api_key ? `(${settings.gemini_api_key})` : '(not set)';
            document.getElementById('tts-current').textContent =
                settings.tts_api_key ? `(${settings.tts_api_key})` : '(not set)';
        }

        for (const button of document.querySelectorAll('button[data-setting]')) {
            button.addEventListener('click', async () => {
                const setting = button.dataset.setting;
                const input = document.getElementById(button.dataset.input);
                const message = document.getElementById(`${setting}-message`);

                const response = await fetch(`/api/settings/${setting}`, {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ api_key: input.value }),
                });
                const payload = await response.json().catch(() => null);
                if (response.ok) {
                    message.textContent = payload?.message || 'Saved';
                    message.style.color = '#10b981';
                    input.value = '';
                    loadCurrent();
                } else {
                    message.textContent = payload?.error?.message || 'Save failed';
                    message.style.color = '#ef4444';
                }
            });
        }

        loadCurrent();
    </script>
</body>
</html>"#;
