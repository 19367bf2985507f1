//! Static texts and images of the intro page.

use super::fragment::{CollapseSection, ImageRef, Span};

pub fn introduction_paragraph() -> Vec<Span> {
    vec![
        Span::plain(
            "Un sistema de monitoreo instalado en una región costera recoge datos cada 10 minutos sobre variables como ",
        ),
        Span::bold("velocidad y dirección del viento, temperatura, presión atmosférica y humedad relativa"),
        Span::plain(
            ", con el objetivo de evaluar la viabilidad de la generación de energía eólica. Estos sensores son fundamentales para ",
        ),
        Span::bold("cuantificar recursos eólicos y monitorear condiciones climáticas"),
        Span::plain(". Este proyecto, liderado por "),
        Span::bold("Emanuel Carbonell y Kanery Camargo"),
        Span::plain(", utiliza técnicas de "),
        Span::bold("Machine Learning (ARIMA, Prophet, LSTM)"),
        Span::plain(
            " para analizar estas series de tiempo, identificar patrones y optimizar la predicción de energía eólica. \
             Además, se desarrollarán visualizaciones interactivas para facilitar la toma de decisiones estratégicas \
             basadas en estos datos.",
        ),
    ]
}

pub fn introduction_images() -> Vec<ImageRef> {
    vec![
        ImageRef::new("intro2.png", 360.0, Some(340.0)),
        ImageRef::new("intro.png", 360.0, Some(340.0)),
    ]
}

pub const DESCRIPTION_TEXT: &str = "Este proyecto utiliza un conjunto de datos meteorológicos capturados a \
    través de sensores instalados a diferentes alturas (40 m, 60 m, 80 m y 100 m) para analizar las condiciones \
    atmosféricas en una región costera. El objetivo principal con este conjunto de datos es identificar patrones \
    clave y utilizar técnicas avanzadas de Machine Learning para optimizar la predicción de la energía eólica.";

const KEY_VARIABLES_TEXT: &str = "- Velocidad del viento (m/s), medida en cada una de las alturas.\n\
    - Dirección del viento (grados), correspondiente a la orientación en cada nivel.\n\
    - Temperatura del aire (°C), registrada a 20 m y 100 m.\n\
    - Presión atmosférica (hPa) y humedad relativa (%), medidas por los sensores.";

const DIMENSIONALITY_TEXT: &str = "Para evitar la colinealidad, se utilizó el Factor de Inflación de Varianza \
    (VIF), que identifica y elimina variables altamente correlacionadas. Esto mejora la precisión y eficiencia de \
    los modelos, asegurando que solo las variables más relevantes se usen en el análisis, evitando resultados \
    distorsionados o sobreajuste.";

const GROUPING_TEXT: &str = "Los datos se agruparon por la altura de los sensores (40 m, 60 m, 80 m, 100 m) para \
    un análisis más preciso de las condiciones atmosféricas en distintos niveles. Esto permite evaluar cómo varían \
    el viento y la temperatura, lo cual es clave para la viabilidad de proyectos eólicos. El agrupamiento también \
    facilita la visualización y el análisis de patrones, mejorando la interpretación de los datos.";

pub fn description_collapse() -> CollapseSection {
    let side = |a: &str, b: &str| vec![ImageRef::new(a, 180.0, Some(180.0)), ImageRef::new(b, 180.0, Some(180.0))];
    CollapseSection {
        buttons: [
            "Variables Clave".to_string(),
            "Reducción de Dimensionalidad".to_string(),
            "Agrupación de los Datos".to_string(),
        ],
        panels: [
            KEY_VARIABLES_TEXT.to_string(),
            DIMENSIONALITY_TEXT.to_string(),
            GROUPING_TEXT.to_string(),
        ],
        left_images: side("desc1.png", "desc2.png"),
        right_images: side("desc3.png", "desc4.png"),
    }
}

pub const DICTIONARY_TEXT: &str = "A continuación, se presenta un diccionario de variables con una breve \
    descripción de cada una, esto es importante para entender el significado de cada columna en el conjunto de datos.:";

pub const DICTIONARY_COLUMNS: [&str; 2] = ["Variable", "Descripción"];

pub const LOADING_TEXT: &str = "Cargando datos...";

pub const LOAD_FAILED_TEXT: &str = "No se pudieron cargar los datos";
