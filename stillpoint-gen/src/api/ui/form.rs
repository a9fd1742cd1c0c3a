//! Request form page handler

use axum::response::{Html, IntoResponse};

/// GET /
///
/// Emotional-transition request form
pub async fn form_page() -> impl IntoResponse {
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Stillpoint</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }}
        h1 {{
            font-size: 26px;
            color: #4a9eff;
        }}
        .subtitle {{
            color: #888;
            font-size: 16px;
        }}
        .build-info {{
            text-align: right;
            font-size: 13px;
            color: #888;
            font-family: 'Courier New', monospace;
            line-height: 1.3;
        }}
        .container {{
            max-width: 560px;
            margin: 0 auto;
            padding: 0 20px 40px;
        }}
        label {{
            display: block;
            margin: 18px 0 6px;
            color: #aaa;
        }}
        input, select {{
            width: 100%;
            padding: 10px;
            background: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 6px;
            color: #e0e0e0;
            font-size: 15px;
        }}
        button {{
            margin-top: 26px;
            width: 100%;
            padding: 12px;
            background: #4a9eff;
            border: none;
            border-radius: 6px;
            color: #fff;
            font-size: 16px;
            cursor: pointer;
        }}
        button:disabled {{
            background: #345;
            cursor: wait;
        }}
        .error {{
            margin-top: 14px;
            color: #ef4444;
            display: none;
        }}
        footer a {{
            color: #4a9eff;
        }}
    </style>
</head>
<body>
    <header>
        <div>
            <h1>Stillpoint</h1>
            <div class="subtitle">Guided meditation generation</div>
        </div>
        <div class="build-info">
            <div>v{version} ({git_hash})</div>
            <div>{build_timestamp}</div>
        </div>
    </header>
    <div class="container">
        <form id="meditation-form">
            <label for="username">Your name</label>
            <input id="username" name="username" minlength="3" maxlength="20" required
                   placeholder="3 to 20 characters">

            <label for="expertise">Experience level</label>
            <select id="expertise" name="expertise">
                <option value="BEGINNER">Beginner</option>
                <option value="INTERMEDIATE">Intermediate</option>
                <option value="ADVANCED">Advanced</option>
            </select>

            <label for="style">Meditation style</label>
            <select id="style" name="style">
                <option value="BREATH">Breath</option>
                <option value="SOUND">Sound</option>
                <option value="FORM">Form</option>
                <option value="VISUALIZATION">Visualization</option>
            </select>

            <label for="from_emotion">I am feeling</label>
            <select id="from_emotion" name="from_emotion">
                <option value="ANXIETY">Anxiety</option>
                <option value="FEAR">Fear</option>
                <option value="GUILT">Guilt</option>
                <option value="ANGER">Anger</option>
                <option value="SADNESS">Sadness</option>
            </select>

            <label for="to_emotion">I want to feel</label>
            <select id="to_emotion" name="to_emotion">
                <option value="JOY">Joy</option>
                <option value="LOVE">Love</option>
                <option value="PEACE">Peace</option>
                <option value="GRATITUDE">Gratitude</option>
                <option value="ACCEPTANCE">Acceptance</option>
            </select>

            <button type="submit" id="submit-button">Generate my meditation</button>
            <div class="error" id="form-error"></div>
        </form>
        <p style="margin-top: 30px; color: #666;">
            Keys not configured? Visit <a href="/settings">settings</a>.
        </p>
    </div>
    <script>
        const form = document.getElementById('meditation-form');
        const button = document.getElementById('submit-button');
        const errorBox = document.getElementById('form-error');

        form.addEventListener('submit', async (e) => {{
            e.preventDefault();
            button.disabled = true;
            errorBox.style.display = 'none';

            const body = {{
                username: document.getElementById('username').value.trim(),
                expertise: document.getElementById('expertise').value,
                style: document.getElementById('style').value,
                from_emotion: document.getElementById('from_emotion').value,
                to_emotion: document.getElementById('to_emotion').value,
            }};

            try {{
                const response = await fetch('/meditations', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify(body),
                }});
                if (response.status === 201) {{
                    const meditation = await response.json();
                    window.location.href = `/meditations/${{meditation.meditation_id}}/view`;
                    return;
                }}
                const payload = await response.json().catch(() => null);
                errorBox.textContent = payload?.error?.message || `Request failed (${{response.status}})`;
                errorBox.style.display = 'block';
            }} catch (err) {{
                errorBox.textContent = 'Could not reach the server';
                errorBox.style.display = 'block';
            }} finally {{
                button.disabled = false;
            }}
        }});
    </script>
</body>
</html>"#
    );

    Html(html)
}
